use std::collections::HashSet;

use uuid::Uuid;

use crate::entities::prize_entity as prizes;
use crate::entities::{Separate, SeparateCount};
use crate::error::{AppError, AppResult};
use crate::models::{BatchInput, CreatePrizeRequest, UpdatePrizeRequest};

/// 奖项注册表：独占奖项配置及名额计数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrizeRegistry {
    prizes: Vec<prizes::Model>,
}

impl PrizeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(prizes: Vec<prizes::Model>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for p in &prizes {
            p.check_consistency()
                .map_err(|e| AppError::ConfigError(e.to_string()))?;
            if !seen.insert(p.id.clone()) {
                return Err(AppError::ConfigError(format!("Duplicate prize id {}", p.id)));
            }
        }
        Ok(Self { prizes })
    }

    pub fn prizes(&self) -> &[prizes::Model] {
        &self.prizes
    }

    /// 按 sort 升序（相同时按 id）
    pub fn list_sorted(&self) -> Vec<&prizes::Model> {
        let mut list: Vec<_> = self.prizes.iter().collect();
        list.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.id.cmp(&b.id)));
        list
    }

    pub fn get(&self, prize_id: &str) -> AppResult<&prizes::Model> {
        self.prizes
            .iter()
            .find(|p| p.id == prize_id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))
    }

    fn get_mut(&mut self, prize_id: &str) -> AppResult<&mut prizes::Model> {
        self.prizes
            .iter_mut()
            .find(|p| p.id == prize_id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))
    }

    pub fn create(&mut self, req: CreatePrizeRequest) -> AppResult<prizes::Model> {
        let id = req
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.prizes.iter().any(|p| p.id == id) {
            return Err(AppError::ValidationError(format!("Prize {id} already exists")));
        }

        let mut prize = prizes::Model::new(id, req.name, req.count, req.frequency.unwrap_or(1));
        prize.sort = req.sort.unwrap_or_default();
        prize.is_all = req.is_all.unwrap_or(false);
        prize.picture = req.picture.unwrap_or_default();
        prize.desc = req.desc.unwrap_or_default();
        prize.is_show = req.is_show.unwrap_or(true);
        prize.fixed_winners = req.fixed_winners;
        if let Some(batches) = req.separate_count {
            prize.separate_count = build_batches(batches.enable, batches.count_list, &[]);
        }
        prize.validate()?;

        self.prizes.push(prize.clone());
        Ok(prize)
    }

    /// 修改配置，保留已有计数；修改后违反不变量则拒绝
    pub fn update(&mut self, prize_id: &str, req: UpdatePrizeRequest) -> AppResult<prizes::Model> {
        let current = self.get(prize_id)?;
        let mut prize = current.clone();

        if let Some(name) = req.name {
            prize.name = name;
        }
        if let Some(sort) = req.sort {
            prize.sort = sort;
        }
        if let Some(is_all) = req.is_all {
            prize.is_all = is_all;
        }
        if let Some(count) = req.count {
            prize.count = count;
        }
        if let Some(frequency) = req.frequency {
            prize.frequency = frequency;
        }
        if let Some(picture) = req.picture {
            prize.picture = picture;
        }
        if let Some(desc) = req.desc {
            prize.desc = desc;
        }
        if let Some(is_show) = req.is_show {
            prize.is_show = is_show;
        }
        if let Some(batches) = req.separate_count {
            prize.separate_count = build_batches(
                batches.enable,
                batches.count_list,
                &current.separate_count.count_list,
            );
        }
        if let Some(fixed) = req.fixed_winners {
            prize.fixed_winners = Some(fixed);
        }
        prize.is_used = prize.used_count >= prize.count;
        prize.validate()?;

        let slot = self.get_mut(prize_id)?;
        *slot = prize.clone();
        Ok(prize)
    }

    pub fn remove(&mut self, prize_id: &str) -> AppResult<prizes::Model> {
        let idx = self
            .prizes
            .iter()
            .position(|p| p.id == prize_id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;
        Ok(self.prizes.remove(idx))
    }

    /// 剩余名额（已计入当前批次上限）
    pub fn remaining_count(&self, prize_id: &str) -> AppResult<u32> {
        Ok(self.get(prize_id)?.remaining())
    }

    pub fn active_batch(&self, prize_id: &str) -> AppResult<Option<&Separate>> {
        let prize = self.get(prize_id)?;
        if !prize.batches_enabled() {
            return Ok(None);
        }
        Ok(prize.active_batch())
    }

    /// 扣减名额，超出剩余名额返回 Overdraw
    pub fn commit(&mut self, prize_id: &str, winner_count: u32) -> AppResult<()> {
        self.get_mut(prize_id)?.consume(winner_count)
    }

    pub fn reset_counts(&mut self, prize_id: &str) -> AppResult<()> {
        self.get_mut(prize_id)?.reset_counts();
        Ok(())
    }

    pub fn reset_all_counts(&mut self) {
        for prize in &mut self.prizes {
            prize.reset_counts();
        }
    }

    /// 回滚用：恢复奖项快照
    pub(crate) fn restore(&mut self, prize: prizes::Model) {
        if let Some(slot) = self.prizes.iter_mut().find(|p| p.id == prize.id) {
            *slot = prize;
        }
    }
}

/// 根据输入构建分批配置，同 id 批次沿用已用计数
fn build_batches(enable: bool, inputs: Vec<BatchInput>, existing: &[Separate]) -> SeparateCount {
    let count_list = inputs
        .into_iter()
        .map(|input| {
            let id = input
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let used_count = existing
                .iter()
                .find(|b| b.id == id)
                .map(|b| b.used_count)
                .unwrap_or(0);
            Separate {
                id,
                count: input.count,
                used_count,
            }
        })
        .collect();
    SeparateCount { enable, count_list }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::SeparateCountInput;

    pub(crate) fn prize_request(id: &str, count: u32, frequency: u32) -> CreatePrizeRequest {
        CreatePrizeRequest {
            id: Some(id.into()),
            name: format!("Prize {id}"),
            sort: None,
            is_all: None,
            count,
            frequency: Some(frequency),
            picture: None,
            separate_count: None,
            desc: None,
            is_show: None,
            fixed_winners: None,
        }
    }

    pub(crate) fn batches(counts: &[u32]) -> SeparateCountInput {
        SeparateCountInput {
            enable: true,
            count_list: counts
                .iter()
                .enumerate()
                .map(|(i, c)| BatchInput {
                    id: Some(format!("b{}", i + 1)),
                    count: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn test_create_and_list_sorted() {
        let mut reg = PrizeRegistry::new();
        let mut a = prize_request("a", 5, 1);
        a.sort = Some(2);
        let mut b = prize_request("b", 5, 1);
        b.sort = Some(1);
        reg.create(a).unwrap();
        reg.create(b).unwrap();
        let ids: Vec<_> = reg.list_sorted().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(reg.create(prize_request("a", 1, 1)).is_err());
    }

    #[test]
    fn test_commit_with_batches() {
        let mut reg = PrizeRegistry::new();
        let mut req = prize_request("p", 10, 5);
        req.separate_count = Some(batches(&[2, 3]));
        reg.create(req).unwrap();

        assert_eq!(reg.remaining_count("p").unwrap(), 2);
        assert_eq!(reg.active_batch("p").unwrap().unwrap().id, "b1");
        reg.commit("p", 2).unwrap();
        assert_eq!(reg.active_batch("p").unwrap().unwrap().id, "b2");
        assert_eq!(reg.remaining_count("p").unwrap(), 3);

        let err = reg.commit("p", 4).unwrap_err();
        assert!(matches!(err, AppError::Overdraw { .. }));
        reg.commit("p", 3).unwrap();
        assert!(reg.active_batch("p").unwrap().is_none());
        assert_eq!(reg.remaining_count("p").unwrap(), 0);

        let prize = reg.get("p").unwrap();
        let sum: u32 = prize.separate_count.count_list.iter().map(|b| b.used_count).sum();
        assert_eq!(sum, prize.used_count);
    }

    #[test]
    fn test_commit_sets_fully_drawn() {
        let mut reg = PrizeRegistry::new();
        reg.create(prize_request("p", 2, 2)).unwrap();
        reg.commit("p", 2).unwrap();
        assert!(reg.get("p").unwrap().is_used);
        reg.reset_counts("p").unwrap();
        let prize = reg.get("p").unwrap();
        assert!(!prize.is_used);
        assert_eq!(prize.used_count, 0);
    }

    #[test]
    fn test_update_keeps_counts_and_rejects_invariant_break() {
        let mut reg = PrizeRegistry::new();
        let mut req = prize_request("p", 10, 2);
        req.separate_count = Some(batches(&[4, 4]));
        reg.create(req).unwrap();
        reg.commit("p", 2).unwrap();

        let updated = reg
            .update(
                "p",
                UpdatePrizeRequest {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.used_count, 2);
        assert_eq!(updated.separate_count.count_list[0].used_count, 2);

        // 删掉已使用的批次会导致计数不一致
        let err = reg
            .update(
                "p",
                UpdatePrizeRequest {
                    separate_count: Some(SeparateCountInput {
                        enable: true,
                        count_list: vec![BatchInput {
                            id: Some("new".into()),
                            count: 5,
                        }],
                    }),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(reg.get("p").unwrap().name, "Renamed");
    }

    #[test]
    fn test_unknown_prize() {
        let reg = PrizeRegistry::new();
        assert!(matches!(
            reg.remaining_count("nope"),
            Err(AppError::NotFound(_))
        ));
    }
}
