// ==========================================
// 学生档案管理 - 驾驶舱 API
// ==========================================
// 职责: 学生统计聚合查询
// ==========================================

use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::domain::dashboard::DashboardStats;
use crate::repository::DashboardRepository;

/// 驾驶舱API
pub struct DashboardApi {
    dashboard_repo: Arc<DashboardRepository>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(dashboard_repo: Arc<DashboardRepository>) -> Self {
        Self { dashboard_repo }
    }

    /// 获取驾驶舱统计
    ///
    /// # 返回
    /// - total/male/female 计数, 按城市、按出生年份的分组计数
    pub fn get_stats(&self) -> ApiResult<DashboardStats> {
        let stats = self.dashboard_repo.load_stats()?;
        tracing::debug!(total = stats.total_students, "驾驶舱统计完成");
        Ok(stats)
    }
}
