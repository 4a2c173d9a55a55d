use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::person_entity;

/// 导入人员
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ImportPersonItem {
    /// 编号（如工号）
    pub uid: String,
    /// 稳定标识，缺省时自动生成
    pub uuid: Option<String>,
    pub name: String,
    pub department: Option<String>,
    pub identity: Option<String>,
    pub avatar: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ImportPersonsRequest {
    pub persons: Vec<ImportPersonItem>,
}

/// 人员列表查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PersonQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
    /// true 仅中奖者 / false 仅未中奖者
    pub won: Option<bool>,
}

/// 一条中奖记录
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonWinResponse {
    pub prize_id: String,
    pub prize_name: String,
    pub won_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonResponse {
    pub id: i64,
    pub uid: String,
    pub uuid: String,
    pub name: String,
    pub department: String,
    pub identity: String,
    pub avatar: Option<String>,
    pub is_win: bool,
    pub x: f64,
    pub y: f64,
    pub wins: Vec<PersonWinResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&person_entity::Model> for PersonResponse {
    fn from(m: &person_entity::Model) -> Self {
        PersonResponse {
            id: m.id,
            uid: m.uid.clone(),
            uuid: m.uuid.clone(),
            name: m.name.clone(),
            department: m.department.clone(),
            identity: m.identity.clone(),
            avatar: m.avatar.clone(),
            is_win: m.is_win,
            x: m.x,
            y: m.y,
            wins: m
                .wins()
                .map(|w| PersonWinResponse {
                    prize_id: w.prize_id.to_string(),
                    prize_name: w.prize_name.to_string(),
                    won_at: w.won_at,
                })
                .collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
