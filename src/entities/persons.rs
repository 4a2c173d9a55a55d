use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 参与抽奖的人员
/// 说明:
/// - id: 奖池内唯一自增ID
/// - uuid: 跨会话稳定标识（内定配置通过它引用人员）
/// - uid: 导入批次内的编号（如工号）
/// - prize_name / prize_id / prize_time 三个序列一一对应，每个下标描述一次中奖
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: i64,
    pub uid: String,
    pub uuid: String,
    pub name: String,
    /// 部门
    pub department: String,
    /// 身份 / 组织标签
    pub identity: String,
    pub avatar: Option<String>,
    pub is_win: bool,
    pub x: f64,
    pub y: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    prize_name: Vec<String>,
    prize_id: Vec<String>,
    prize_time: Vec<DateTime<Utc>>,
}

/// 一次中奖记录（由三个并行序列的同一下标组成）
#[derive(Clone, Debug, PartialEq)]
pub struct WinEntry<'a> {
    pub prize_name: &'a str,
    pub prize_id: &'a str,
    pub won_at: DateTime<Utc>,
}

impl Model {
    pub fn new(id: i64, uid: String, uuid: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            uid,
            uuid,
            name,
            department: String::new(),
            identity: String::new(),
            avatar: None,
            is_win: false,
            x: 0.0,
            y: 0.0,
            created_at: now,
            updated_at: now,
            prize_name: Vec::new(),
            prize_id: Vec::new(),
            prize_time: Vec::new(),
        }
    }

    /// 是否已中过指定奖项
    pub fn has_won_prize(&self, prize_id: &str) -> bool {
        self.prize_id.iter().any(|p| p == prize_id)
    }

    pub fn win_count(&self) -> usize {
        self.prize_id.len()
    }

    pub fn wins(&self) -> impl Iterator<Item = WinEntry<'_>> {
        self.prize_name
            .iter()
            .zip(&self.prize_id)
            .zip(&self.prize_time)
            .map(|((name, id), at)| WinEntry {
                prize_name: name,
                prize_id: id,
                won_at: *at,
            })
    }

    /// 追加一次中奖（三个序列同步追加）
    pub fn push_win(&mut self, prize_id: &str, prize_name: &str, at: DateTime<Utc>) {
        self.prize_name.push(prize_name.to_string());
        self.prize_id.push(prize_id.to_string());
        self.prize_time.push(at);
        self.is_win = true;
        self.updated_at = at;
    }

    /// 清空中奖信息，保留身份信息
    pub fn clear_wins(&mut self) {
        self.prize_name.clear();
        self.prize_id.clear();
        self.prize_time.clear();
        self.is_win = false;
    }

    /// 三个中奖序列长度一致，且 is_win 与记录是否为空相符
    pub fn is_consistent(&self) -> bool {
        self.prize_name.len() == self.prize_id.len()
            && self.prize_id.len() == self.prize_time.len()
            && self.is_win == !self.prize_id.is_empty()
    }
}
