use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::entities::person_entity as persons;
use crate::error::{AppError, AppResult};
use crate::services::{PersonPool, PrizeRegistry, batch_scheduler, fixed_winner_resolver};

/// 抽奖策略
#[derive(Debug, Clone, Copy)]
pub struct DrawPolicy {
    /// 中过任一奖项的人不再参与（全员奖项除外）
    pub exclude_any_win: bool,
    /// 单次抽取人数上限
    pub per_draw_limit: u32,
}

/// 一位中奖者
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnWinner {
    pub position: u32,
    pub person_id: i64,
    pub uuid: String,
    pub name: String,
    pub department: String,
    pub avatar: Option<String>,
    /// 是否为内定
    pub guaranteed: bool,
}

impl DrawnWinner {
    fn new(position: u32, person: &persons::Model, guaranteed: bool) -> Self {
        Self {
            position,
            person_id: person.id,
            uuid: person.uuid.clone(),
            name: person.name.clone(),
            department: person.department.clone(),
            avatar: person.avatar.clone(),
            guaranteed,
        }
    }
}

/// 一次抽取的结果，按位置排序；提交后即丢弃
#[derive(Debug, Clone, PartialEq)]
pub struct DrawResult {
    pub prize_id: String,
    pub prize_name: String,
    pub winners: Vec<DrawnWinner>,
    pub drawn_at: DateTime<Utc>,
}

impl DrawResult {
    pub fn count(&self) -> u32 {
        self.winners.len() as u32
    }
}

/// 抽奖引擎：只读奖池与奖项，不修改任何状态
pub struct DrawEngine<'a> {
    pool: &'a PersonPool,
    registry: &'a PrizeRegistry,
    policy: DrawPolicy,
}

impl<'a> DrawEngine<'a> {
    pub fn new(pool: &'a PersonPool, registry: &'a PrizeRegistry, policy: DrawPolicy) -> Self {
        Self {
            pool,
            registry,
            policy,
        }
    }

    /// 进行一次抽取:
    /// 1. 校验请求人数（不超过单次上限）
    /// 2. 计算本次允许人数 n（频次与剩余名额取小）
    /// 3. 确定内定人员及其位置
    /// 4. 从剩余候选人中等概率补足，不足则整体失败
    /// 5. 随机补位者依次填入最小的空闲位置
    pub fn draw<R: Rng + ?Sized>(
        &self,
        prize_id: &str,
        requested: Option<u32>,
        rng: &mut R,
    ) -> AppResult<DrawResult> {
        if let Some(requested) = requested {
            if requested > self.policy.per_draw_limit {
                return Err(AppError::DrawLimitExceeded {
                    requested,
                    limit: self.policy.per_draw_limit,
                });
            }
            if requested == 0 {
                return Err(AppError::ValidationError(
                    "Requested count must be positive".into(),
                ));
            }
        }

        let prize = self.registry.get(prize_id)?;
        let requested = requested.unwrap_or(prize.frequency);
        if requested > self.policy.per_draw_limit {
            return Err(AppError::DrawLimitExceeded {
                requested,
                limit: self.policy.per_draw_limit,
            });
        }
        let n = batch_scheduler::allowed(self.registry, prize_id, requested)?;

        let exclude_any_win = self.policy.exclude_any_win && !prize.is_all;
        let eligible = self.pool.eligible(prize_id, true, exclude_any_win);

        let fixed =
            fixed_winner_resolver::resolve(prize.fixed_winners.as_ref(), &eligible, n, rng);
        let shortfall = (n - fixed.consumed()) as usize;

        let candidates: Vec<&persons::Model> = eligible
            .iter()
            .copied()
            .filter(|p| !fixed.contains(p.id))
            .collect();
        if candidates.len() < shortfall {
            return Err(AppError::InsufficientCandidates {
                needed: shortfall as u32,
                available: candidates.len() as u32,
            });
        }

        let mut sampled: Vec<&persons::Model> = candidates
            .choose_multiple(rng, shortfall)
            .copied()
            .collect();
        sampled.shuffle(rng);

        let guaranteed = fixed.by_position();
        let mut winners: Vec<DrawnWinner> = guaranteed
            .iter()
            .map(|(pos, person)| DrawnWinner::new(*pos, person, true))
            .collect();
        let free = (1..=n).filter(|p| !guaranteed.contains_key(p));
        winners.extend(
            free.zip(sampled)
                .map(|(pos, person)| DrawnWinner::new(pos, person, false)),
        );
        winners.sort_by_key(|w| w.position);

        Ok(DrawResult {
            prize_id: prize.id.clone(),
            prize_name: prize.name.clone(),
            winners,
            drawn_at: Utc::now(),
        })
    }
}
