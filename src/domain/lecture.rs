// ==========================================
// 校园服务聚合网关 - 讲座打卡领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 一卡通门禁流水中的一条打卡记录（未过滤）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinRecord {
    pub time: i64, // epoch 毫秒
    pub machine_id: u32,
}

/// 讲座打卡记录（已过滤、去重）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureAttendance {
    pub time: i64,
    pub location: String,
}
