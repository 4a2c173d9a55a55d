use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::{DrawResult, DrawnWinner};

/// 抽奖请求（来自界面操作或远程控制消息）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DrawRequest {
    pub prize_id: String,
    /// 本次人数，不传则使用奖项的 frequency
    pub count: Option<u32>,
    /// 远程指令ID（仅记录日志）
    pub command_id: Option<String>,
    /// 远程指令时间（仅记录日志）
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawWinnerResponse {
    /// 展示位置（从 1 开始）
    pub position: u32,
    pub person_id: i64,
    pub uuid: String,
    pub name: String,
    pub department: String,
    pub avatar: Option<String>,
}

impl From<DrawnWinner> for DrawWinnerResponse {
    fn from(w: DrawnWinner) -> Self {
        DrawWinnerResponse {
            position: w.position,
            person_id: w.person_id,
            uuid: w.uuid,
            name: w.name,
            department: w.department,
            avatar: w.avatar,
        }
    }
}

/// 抽奖结果，按位置排序
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResultResponse {
    pub prize_id: String,
    pub prize_name: String,
    pub winners: Vec<DrawWinnerResponse>,
    pub drawn_at: DateTime<Utc>,
    /// 是否已提交（预览为 false）
    pub committed: bool,
}

impl DrawResultResponse {
    pub fn new(result: DrawResult, committed: bool) -> Self {
        DrawResultResponse {
            prize_id: result.prize_id,
            prize_name: result.prize_name,
            winners: result.winners.into_iter().map(Into::into).collect(),
            drawn_at: result.drawn_at,
            committed,
        }
    }
}

/// 重置类操作的返回
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResetResponse {
    pub persons_affected: usize,
    pub prizes_affected: usize,
}
