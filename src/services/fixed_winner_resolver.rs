use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::Rng;
use rand::seq::index;

use crate::entities::person_entity as persons;
use crate::entities::{FixedWinnerItem, FixedWinners};

/// 内定人员的位置归属结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClaim {
    /// 指定位置生效
    Assigned(u32),
    /// 指定位置冲突或越界，改为自动分配
    DisplacedToAuto { requested: u32, position: u32 },
    /// 未指定位置，自动分配
    Auto(u32),
}

impl SlotClaim {
    pub fn position(&self) -> u32 {
        match *self {
            SlotClaim::Assigned(p) => p,
            SlotClaim::DisplacedToAuto { position, .. } => position,
            SlotClaim::Auto(p) => p,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedGuarantee<'a> {
    pub entry: &'a FixedWinnerItem,
    pub person: &'a persons::Model,
    pub claim: SlotClaim,
}

/// 本次抽取生效的内定结果
#[derive(Debug, Clone, Default)]
pub struct FixedResolution<'a> {
    pub guarantees: Vec<ResolvedGuarantee<'a>>,
}

impl<'a> FixedResolution<'a> {
    /// 占用的名额数
    pub fn consumed(&self) -> u32 {
        self.guarantees.len() as u32
    }

    /// 位置 -> 人员
    pub fn by_position(&self) -> BTreeMap<u32, &'a persons::Model> {
        self.guarantees
            .iter()
            .map(|g| (g.claim.position(), g.person))
            .collect()
    }

    pub fn contains(&self, person_id: i64) -> bool {
        self.guarantees.iter().any(|g| g.person.id == person_id)
    }
}

/// 计算本次抽取中生效的内定人员及其位置
///
/// - `eligible`: 当前可参与本奖项的候选人（已按中奖规则排除）
/// - `n`: 本次允许产生的中奖人数
///
/// 内定人数超过 n 时，从内定名单中等概率随机选出 n 人。
pub fn resolve<'a, R: Rng + ?Sized>(
    config: Option<&'a FixedWinners>,
    eligible: &[&'a persons::Model],
    n: u32,
    rng: &mut R,
) -> FixedResolution<'a> {
    let Some(config) = config else {
        return FixedResolution::default();
    };
    if n == 0 || !config.enable || config.list.is_empty() {
        return FixedResolution::default();
    }

    // 过滤掉已删除或不再具备资格的人员
    let mut seen = HashSet::new();
    let mut filtered: Vec<(&'a FixedWinnerItem, &'a persons::Model)> = Vec::new();
    for entry in &config.list {
        match eligible.iter().find(|p| p.uuid == entry.uuid) {
            Some(person) => {
                if seen.insert(person.id) {
                    filtered.push((entry, *person));
                }
            }
            None => {
                log::warn!(
                    "Fixed winner {} ({}) is not eligible, skipped",
                    entry.name,
                    entry.uuid
                );
            }
        }
    }

    let slots = n as usize;
    if filtered.len() > slots {
        log::info!(
            "Fixed winners ({}) exceed available slots ({slots}), sampling a subset",
            filtered.len()
        );
        let mut picked = index::sample(rng, filtered.len(), slots).into_vec();
        // 保持名单原有顺序，位置分配规则与全部生效时一致
        picked.sort_unstable();
        filtered = picked.into_iter().map(|i| filtered[i]).collect();
    }

    FixedResolution {
        guarantees: assign_positions(filtered, n),
    }
}

/// 位置分配：
/// 1. 指定位置按名单顺序占位，后来者遇到冲突或越界则转为自动分配
/// 2. 其余按名单顺序依次取最小的空闲位置
fn assign_positions<'a>(
    selected: Vec<(&'a FixedWinnerItem, &'a persons::Model)>,
    n: u32,
) -> Vec<ResolvedGuarantee<'a>> {
    let mut claimed = BTreeSet::new();
    let mut claims: Vec<Option<SlotClaim>> = selected
        .iter()
        .map(|(entry, _)| match entry.position {
            Some(p) if (1..=n).contains(&p) && claimed.insert(p) => Some(SlotClaim::Assigned(p)),
            _ => None,
        })
        .collect();

    let mut free = (1..=n).filter(|p| !claimed.contains(p));
    for ((entry, _), claim) in selected.iter().zip(claims.iter_mut()) {
        if claim.is_some() {
            continue;
        }
        // selected.len() <= n，空闲位置一定够用
        let Some(position) = free.next() else { break };
        *claim = Some(match entry.position {
            Some(requested) => SlotClaim::DisplacedToAuto {
                requested,
                position,
            },
            None => SlotClaim::Auto(position),
        });
    }

    selected
        .into_iter()
        .zip(claims)
        .filter_map(|((entry, person), claim)| {
            claim.map(|claim| ResolvedGuarantee {
                entry,
                person,
                claim,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::person_pool::tests::pool_of;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(uid: &str, position: Option<u32>) -> FixedWinnerItem {
        FixedWinnerItem {
            uuid: format!("uuid-{uid}"),
            name: format!("Person {uid}"),
            position,
        }
    }

    fn fixed(list: Vec<FixedWinnerItem>) -> FixedWinners {
        FixedWinners { enable: true, list }
    }

    #[test]
    fn test_disabled_or_zero_slots_returns_empty() {
        let pool = pool_of(5);
        let eligible = pool.eligible("p", true, false);
        let mut rng = StdRng::seed_from_u64(1);

        let mut cfg = fixed(vec![entry("001", None)]);
        assert_eq!(resolve(Some(&cfg), &eligible, 0, &mut rng).consumed(), 0);
        assert_eq!(resolve(None, &eligible, 3, &mut rng).consumed(), 0);
        cfg.enable = false;
        assert_eq!(resolve(Some(&cfg), &eligible, 3, &mut rng).consumed(), 0);
    }

    #[test]
    fn test_unpositioned_get_lowest_free_positions() {
        let pool = pool_of(5);
        let eligible = pool.eligible("p", true, false);
        let cfg = fixed(vec![
            entry("001", None),
            entry("002", Some(1)),
            entry("003", None),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        let res = resolve(Some(&cfg), &eligible, 5, &mut rng);
        let positions: Vec<_> = res.guarantees.iter().map(|g| g.claim).collect();
        assert_eq!(
            positions,
            vec![SlotClaim::Auto(2), SlotClaim::Assigned(1), SlotClaim::Auto(3)]
        );
    }

    #[test]
    fn test_position_conflict_resolved_by_list_order() {
        let pool = pool_of(5);
        let eligible = pool.eligible("p", true, false);
        let cfg = fixed(vec![entry("001", Some(2)), entry("002", Some(2))]);
        let mut rng = StdRng::seed_from_u64(1);
        let res = resolve(Some(&cfg), &eligible, 3, &mut rng);
        assert_eq!(res.guarantees[0].claim, SlotClaim::Assigned(2));
        assert_eq!(
            res.guarantees[1].claim,
            SlotClaim::DisplacedToAuto {
                requested: 2,
                position: 1
            }
        );
        // 配置本身不被修改
        assert_eq!(cfg.list[1].position, Some(2));
    }

    #[test]
    fn test_out_of_range_position_is_displaced() {
        let pool = pool_of(5);
        let eligible = pool.eligible("p", true, false);
        let cfg = fixed(vec![entry("001", Some(3))]);
        let mut rng = StdRng::seed_from_u64(1);
        // 剩余名额不足 frequency 时 n 变小
        let res = resolve(Some(&cfg), &eligible, 2, &mut rng);
        assert_eq!(
            res.guarantees[0].claim,
            SlotClaim::DisplacedToAuto {
                requested: 3,
                position: 1
            }
        );
    }

    #[test]
    fn test_removed_or_ineligible_entries_are_dropped() {
        let mut pool = pool_of(3);
        pool.record_win(2, "p", "Prize", chrono::Utc::now()).unwrap();
        let eligible = pool.eligible("p", true, false);
        let cfg = fixed(vec![
            entry("001", None),
            entry("002", None),
            entry("999", None),
            entry("001", None),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        let res = resolve(Some(&cfg), &eligible, 3, &mut rng);
        assert_eq!(res.consumed(), 1);
        assert_eq!(res.guarantees[0].person.id, 1);
    }

    #[test]
    fn test_oversized_list_samples_uniformly() {
        let pool = pool_of(5);
        let eligible = pool.eligible("p", true, false);
        let cfg = fixed((1..=5).map(|i| entry(&format!("{i:03}"), None)).collect());
        let mut rng = StdRng::seed_from_u64(20240101);
        let mut hits = [0u32; 5];
        let trials = 3000;
        for _ in 0..trials {
            let res = resolve(Some(&cfg), &eligible, 3, &mut rng);
            assert_eq!(res.consumed(), 3);
            let positions: BTreeSet<_> =
                res.guarantees.iter().map(|g| g.claim.position()).collect();
            assert_eq!(positions, BTreeSet::from([1, 2, 3]));
            for g in &res.guarantees {
                hits[(g.person.id - 1) as usize] += 1;
            }
        }
        // 期望 3000 * 3 / 5 = 1800
        for h in hits {
            assert!((1600..=2000).contains(&h), "unbalanced selection: {hits:?}");
        }
    }
}
