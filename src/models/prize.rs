use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{FixedWinners, Picture, Separate, prize_entity};

/// 分批输入（id 相同的批次保留已用计数）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BatchInput {
    pub id: Option<String>,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SeparateCountInput {
    pub enable: bool,
    pub count_list: Vec<BatchInput>,
}

/// 创建奖项（含临时奖项）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePrizeRequest {
    /// 不传则自动生成
    pub id: Option<String>,
    pub name: String,
    pub sort: Option<i32>,
    pub is_all: Option<bool>,
    pub count: u32,
    /// 每次抽取人数 (默认 1)
    pub frequency: Option<u32>,
    pub picture: Option<Picture>,
    pub separate_count: Option<SeparateCountInput>,
    pub desc: Option<String>,
    pub is_show: Option<bool>,
    pub fixed_winners: Option<FixedWinners>,
}

/// 修改奖项配置，计数字段不可直接修改
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePrizeRequest {
    pub name: Option<String>,
    pub sort: Option<i32>,
    pub is_all: Option<bool>,
    pub count: Option<u32>,
    pub frequency: Option<u32>,
    pub picture: Option<Picture>,
    pub separate_count: Option<SeparateCountInput>,
    pub desc: Option<String>,
    pub is_show: Option<bool>,
    pub fixed_winners: Option<FixedWinners>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeResponse {
    pub id: String,
    pub name: String,
    pub sort: i32,
    pub is_all: bool,
    pub count: u32,
    pub used_count: u32,
    /// 当前可抽名额（已计入批次限制）
    pub remaining: u32,
    pub picture: Picture,
    pub separate_enable: bool,
    pub batches: Vec<Separate>,
    pub desc: String,
    pub is_show: bool,
    pub is_used: bool,
    pub frequency: u32,
    pub fixed_winners: Option<FixedWinners>,
}

impl From<&prize_entity::Model> for PrizeResponse {
    fn from(m: &prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id.clone(),
            name: m.name.clone(),
            sort: m.sort,
            is_all: m.is_all,
            count: m.count,
            used_count: m.used_count,
            remaining: m.remaining(),
            picture: m.picture.clone(),
            separate_enable: m.separate_count.enable,
            batches: m.separate_count.count_list.clone(),
            desc: m.desc.clone(),
            is_show: m.is_show,
            is_used: m.is_used,
            frequency: m.frequency,
            fixed_winners: m.fixed_winners.clone(),
        }
    }
}
