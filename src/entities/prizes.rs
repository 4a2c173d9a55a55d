use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::MAX_WINNERS_PER_DRAW;
use crate::error::{AppError, AppResult};

/// 奖项配置
/// 概念说明:
/// - count / used_count: 总名额与已抽出名额，used_count 永远不超过 count
/// - separate_count: 分批释放名额，启用后必须按顺序耗尽每一批
/// - frequency: 每次抽取产生的中奖人数
/// - is_used: 名额已全部抽完
/// - is_all: 全员参与（不受"跨奖项不重复中奖"策略限制）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    pub sort: i32,
    pub is_all: bool,
    pub count: u32,
    pub used_count: u32,
    pub picture: Picture,
    pub separate_count: SeparateCount,
    pub desc: String,
    pub is_show: bool,
    pub is_used: bool,
    pub frequency: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_winners: Option<FixedWinners>,
}

/// 奖品图片引用（仅保存引用，不处理上传）
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Picture {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// 分批配置
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeparateCount {
    pub enable: bool,
    pub count_list: Vec<Separate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Separate {
    pub id: String,
    pub count: u32,
    pub used_count: u32,
}

impl Separate {
    pub fn remaining(&self) -> u32 {
        self.count.saturating_sub(self.used_count)
    }
}

/// 内定配置
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FixedWinners {
    pub enable: bool,
    pub list: Vec<FixedWinnerItem>,
}

/// 内定人员
/// uuid 与 name 冗余保存：人员被删除后仍可从配置中看出是谁
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FixedWinnerItem {
    pub uuid: String,
    pub name: String,
    /// 指定位置（从 1 开始），不指定则自动分配
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl Model {
    pub fn new(id: String, name: String, count: u32, frequency: u32) -> Self {
        Self {
            id,
            name,
            sort: 0,
            is_all: false,
            count,
            used_count: 0,
            picture: Picture::default(),
            separate_count: SeparateCount::default(),
            desc: String::new(),
            is_show: true,
            is_used: false,
            frequency,
            fixed_winners: None,
        }
    }

    pub fn batches_enabled(&self) -> bool {
        self.separate_count.enable
    }

    /// 当前生效批次：按顺序第一个未用完的批次
    pub fn active_batch(&self) -> Option<&Separate> {
        self.separate_count
            .count_list
            .iter()
            .find(|b| b.used_count < b.count)
    }

    fn active_batch_mut(&mut self) -> Option<&mut Separate> {
        self.separate_count
            .count_list
            .iter_mut()
            .find(|b| b.used_count < b.count)
    }

    /// 剩余可抽名额（启用分批时再受当前批次限制）
    pub fn remaining(&self) -> u32 {
        let overall = self.count.saturating_sub(self.used_count);
        if !self.batches_enabled() {
            return overall;
        }
        match self.active_batch() {
            Some(batch) => overall.min(batch.remaining()),
            None => 0,
        }
    }

    /// 扣减名额；超出剩余名额时返回 Overdraw，且不修改任何计数
    pub fn consume(&mut self, winner_count: u32) -> AppResult<()> {
        let remaining = self.remaining();
        if winner_count > remaining {
            return Err(AppError::Overdraw {
                prize_id: self.id.clone(),
                requested: winner_count,
                remaining,
            });
        }
        if winner_count == 0 {
            return Ok(());
        }

        if self.batches_enabled() {
            match self.active_batch_mut() {
                Some(batch) => batch.used_count += winner_count,
                None => {
                    return Err(AppError::InternalError(format!(
                        "Prize {} has no active batch",
                        self.id
                    )));
                }
            }
        }
        self.used_count += winner_count;
        if self.used_count >= self.count {
            self.is_used = true;
        }
        self.check_consistency()
    }

    /// 清零全部计数
    pub fn reset_counts(&mut self) {
        self.used_count = 0;
        self.is_used = false;
        for batch in &mut self.separate_count.count_list {
            batch.used_count = 0;
        }
    }

    /// 计数一致性校验，每次修改后调用
    pub fn check_consistency(&self) -> AppResult<()> {
        if self.used_count > self.count {
            return Err(AppError::InternalError(format!(
                "Prize {} used_count {} exceeds count {}",
                self.id, self.used_count, self.count
            )));
        }
        if self.batches_enabled() {
            let mut used_sum = 0u64;
            for batch in &self.separate_count.count_list {
                if batch.used_count > batch.count {
                    return Err(AppError::InternalError(format!(
                        "Prize {} batch {} used_count {} exceeds count {}",
                        self.id, batch.id, batch.used_count, batch.count
                    )));
                }
                used_sum += u64::from(batch.used_count);
            }
            if used_sum != u64::from(self.used_count) {
                return Err(AppError::InternalError(format!(
                    "Prize {} batch used sum {} disagrees with used_count {}",
                    self.id, used_sum, self.used_count
                )));
            }
        }
        Ok(())
    }

    /// 配置层面的校验（保存时调用）
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError("Prize name is required".into()));
        }
        if self.frequency == 0 || self.frequency > MAX_WINNERS_PER_DRAW {
            return Err(AppError::ValidationError(format!(
                "Prize frequency must be within [1, {MAX_WINNERS_PER_DRAW}]"
            )));
        }
        if self.batches_enabled() {
            let total: u64 = self
                .separate_count
                .count_list
                .iter()
                .map(|b| u64::from(b.count))
                .sum();
            if total > u64::from(self.count) {
                return Err(AppError::ValidationError(format!(
                    "Batch counts sum {total} exceeds prize count {}",
                    self.count
                )));
            }
        }
        if let Some(fixed) = &self.fixed_winners {
            for item in &fixed.list {
                if let Some(pos) = item.position
                    && (pos == 0 || pos > self.frequency)
                {
                    return Err(AppError::ValidationError(format!(
                        "Fixed winner {} position {pos} must be within [1, {}]",
                        item.name, self.frequency
                    )));
                }
            }
        }
        self.check_consistency()
            .map_err(|e| AppError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(id: &str, count: u32, used: u32) -> Separate {
        Separate {
            id: id.into(),
            count,
            used_count: used,
        }
    }

    fn batched_prize() -> Model {
        let mut p = Model::new("p1".into(), "Grand".into(), 10, 5);
        p.separate_count = SeparateCount {
            enable: true,
            count_list: vec![batch("b1", 3, 0), batch("b2", 4, 0)],
        };
        p
    }

    #[test]
    fn test_remaining_without_batches() {
        let mut p = Model::new("p1".into(), "Grand".into(), 5, 2);
        assert_eq!(p.remaining(), 5);
        p.consume(4).unwrap();
        assert_eq!(p.remaining(), 1);
        assert!(!p.is_used);
        p.consume(1).unwrap();
        assert!(p.is_used);
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn test_remaining_is_gated_by_active_batch() {
        let mut p = batched_prize();
        assert_eq!(p.remaining(), 3);
        p.consume(3).unwrap();
        assert_eq!(p.active_batch().unwrap().id, "b2");
        assert_eq!(p.remaining(), 4);
        p.consume(4).unwrap();
        // 批次已用完，即使总名额仍有剩余
        assert!(p.active_batch().is_none());
        assert_eq!(p.remaining(), 0);
        assert_eq!(p.used_count, 7);
        assert!(!p.is_used);
        p.check_consistency().unwrap();
    }

    #[test]
    fn test_consume_overdraw_leaves_state_untouched() {
        let mut p = batched_prize();
        let before = p.clone();
        let err = p.consume(4).unwrap_err();
        assert!(matches!(err, AppError::Overdraw { remaining: 3, .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn test_reset_counts_is_idempotent() {
        let mut p = batched_prize();
        p.consume(3).unwrap();
        p.reset_counts();
        let once = p.clone();
        p.reset_counts();
        assert_eq!(p, once);
        assert_eq!(p.used_count, 0);
        assert!(p.separate_count.count_list.iter().all(|b| b.used_count == 0));
    }

    #[test]
    fn test_check_consistency_detects_drift() {
        let mut p = batched_prize();
        p.used_count = 2;
        assert!(p.check_consistency().is_err());
    }

    #[test]
    fn test_validate_rejects_batch_sum_beyond_u32() {
        let mut p = Model::new("p1".into(), "Grand".into(), 10, 3);
        p.separate_count = SeparateCount {
            enable: true,
            count_list: vec![batch("b1", u32::MAX, 0), batch("b2", 1, 0)],
        };
        assert!(matches!(p.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_check_consistency_handles_huge_batch_usage() {
        let mut p = Model::new("p1".into(), "Grand".into(), u32::MAX, 3);
        p.separate_count = SeparateCount {
            enable: true,
            count_list: vec![batch("b1", u32::MAX, u32::MAX), batch("b2", 1, 1)],
        };
        p.used_count = u32::MAX;
        assert!(matches!(
            p.check_consistency(),
            Err(AppError::InternalError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_position() {
        let mut p = Model::new("p1".into(), "Grand".into(), 10, 3);
        p.fixed_winners = Some(FixedWinners {
            enable: true,
            list: vec![FixedWinnerItem {
                uuid: "u1".into(),
                name: "Alice".into(),
                position: Some(4),
            }],
        });
        assert!(matches!(p.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_validate_allows_duplicate_positions() {
        let mut p = Model::new("p1".into(), "Grand".into(), 10, 3);
        let item = |uuid: &str| FixedWinnerItem {
            uuid: uuid.into(),
            name: uuid.into(),
            position: Some(1),
        };
        p.fixed_winners = Some(FixedWinners {
            enable: true,
            list: vec![item("u1"), item("u2")],
        });
        assert!(p.validate().is_ok());
    }
}
