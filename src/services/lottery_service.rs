use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::config::LotteryConfig;
use crate::database::{Snapshot, SnapshotStore};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePrizeRequest, DrawRequest, DrawResultResponse, ImportPersonsRequest,
    PaginatedResponse, PaginationParams, PersonQuery, PersonResponse, PrizeResponse,
    ResetResponse, UpdatePrizeRequest,
};
use crate::services::{DrawEngine, DrawPolicy, PersonPool, PrizeRegistry, result_recorder};

/// 奖池、奖项与随机源，整体受一把读写锁保护
pub struct LotteryState {
    pub pool: PersonPool,
    pub registry: PrizeRegistry,
    rng: StdRng,
}

#[derive(Clone)]
pub struct LotteryService {
    state: Arc<RwLock<LotteryState>>,
    prize_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    store: Option<SnapshotStore>,
    policy: DrawPolicy,
}

impl LotteryService {
    /// 仅内存运行
    pub fn in_memory(config: &LotteryConfig) -> Self {
        Self::build(config, PersonPool::new(), PrizeRegistry::new(), None)
    }

    /// 从快照文件加载（不存在则为空）
    pub async fn open(config: &LotteryConfig, store: SnapshotStore) -> AppResult<Self> {
        let (pool, registry) = match store.load().await? {
            Some(snapshot) => {
                let restored = snapshot.restore()?;
                log::info!(
                    "Loaded snapshot {}: {} person(s), {} prize(s)",
                    store.path().display(),
                    restored.0.len(),
                    restored.1.prizes().len()
                );
                restored
            }
            None => (PersonPool::new(), PrizeRegistry::new()),
        };
        Ok(Self::build(config, pool, registry, Some(store)))
    }

    fn build(
        config: &LotteryConfig,
        pool: PersonPool,
        registry: PrizeRegistry,
        store: Option<SnapshotStore>,
    ) -> Self {
        let per_draw_limit = config.per_draw_limit();
        for prize in registry.prizes() {
            if prize.frequency > per_draw_limit {
                log::warn!(
                    "Prize {} frequency {} exceeds the per-draw limit {per_draw_limit}; \
                     draws need an explicit count",
                    prize.id,
                    prize.frequency
                );
            }
        }
        let rng = match config.rng_seed {
            Some(seed) => {
                log::warn!("Using fixed RNG seed {seed}; draws are reproducible");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self {
            state: Arc::new(RwLock::new(LotteryState {
                pool,
                registry,
                rng,
            })),
            prize_locks: Arc::new(Mutex::new(HashMap::new())),
            store,
            policy: DrawPolicy {
                exclude_any_win: config.exclude_any_win,
                per_draw_limit,
            },
        }
    }

    // -----------------------------
    // 人员
    // -----------------------------

    pub async fn list_persons(
        &self,
        query: &PersonQuery,
    ) -> AppResult<PaginatedResponse<PersonResponse>> {
        let state = self.state.read().await;
        let items: Vec<PersonResponse> = state
            .pool
            .persons()
            .iter()
            .filter(|p| query.won.is_none_or(|won| p.is_win == won))
            .map(Into::into)
            .collect();
        Ok(PaginationParams::new(query.page, query.per_page).paginate(items))
    }

    pub async fn get_person(&self, person_id: i64) -> AppResult<PersonResponse> {
        let state = self.state.read().await;
        Ok(state.pool.get(person_id)?.into())
    }

    pub async fn import_persons(
        &self,
        req: ImportPersonsRequest,
    ) -> AppResult<Vec<PersonResponse>> {
        if req.persons.is_empty() {
            return Err(AppError::ValidationError("No persons to import".into()));
        }
        let mut state = self.state.write().await;
        let created = state.pool.import(req.persons, Utc::now())?;
        log::info!("Imported {} person(s)", created.len());
        self.persist(&state).await;
        Ok(created.iter().map(Into::into).collect())
    }

    pub async fn delete_person(&self, person_id: i64) -> AppResult<PersonResponse> {
        let mut state = self.state.write().await;
        let removed = state.pool.remove(person_id)?;
        self.persist(&state).await;
        Ok((&removed).into())
    }

    /// 删除全部人员
    pub async fn delete_all_persons(&self) -> AppResult<ResetResponse> {
        let mut state = self.state.write().await;
        let removed = state.pool.clear();
        log::warn!("Deleted all {removed} person(s)");
        self.persist(&state).await;
        Ok(ResetResponse {
            persons_affected: removed,
            prizes_affected: 0,
        })
    }

    /// 清空所有人的中奖信息
    pub async fn reset_wins(&self) -> AppResult<ResetResponse> {
        let mut state = self.state.write().await;
        state.pool.reset_wins();
        log::warn!("Cleared win history of all persons");
        self.persist(&state).await;
        Ok(ResetResponse {
            persons_affected: state.pool.len(),
            prizes_affected: 0,
        })
    }

    // -----------------------------
    // 奖项
    // -----------------------------

    pub async fn list_prizes(&self) -> AppResult<Vec<PrizeResponse>> {
        let state = self.state.read().await;
        Ok(state
            .registry
            .list_sorted()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn get_prize(&self, prize_id: &str) -> AppResult<PrizeResponse> {
        let state = self.state.read().await;
        Ok(state.registry.get(prize_id)?.into())
    }

    pub async fn create_prize(&self, req: CreatePrizeRequest) -> AppResult<PrizeResponse> {
        self.check_frequency(req.frequency.unwrap_or(1))?;
        let mut state = self.state.write().await;
        let prize = state.registry.create(req)?;
        log::info!("Created prize {} ({})", prize.name, prize.id);
        self.persist(&state).await;
        Ok((&prize).into())
    }

    pub async fn update_prize(
        &self,
        prize_id: &str,
        req: UpdatePrizeRequest,
    ) -> AppResult<PrizeResponse> {
        let _guard = self.lock_prize(prize_id).await?;
        let mut state = self.state.write().await;
        if let Some(frequency) = req.frequency {
            self.check_frequency(frequency)?;
        }
        let prize = state.registry.update(prize_id, req)?;
        self.persist(&state).await;
        Ok((&prize).into())
    }

    pub async fn delete_prize(&self, prize_id: &str) -> AppResult<PrizeResponse> {
        let _guard = self.lock_prize(prize_id).await?;
        let mut state = self.state.write().await;
        let removed = state.registry.remove(prize_id)?;
        self.persist(&state).await;
        drop(state);
        self.prize_locks.lock().await.remove(prize_id);
        Ok((&removed).into())
    }

    pub async fn reset_prize_counts(&self, prize_id: &str) -> AppResult<PrizeResponse> {
        let _guard = self.lock_prize(prize_id).await?;
        let mut state = self.state.write().await;
        state.registry.reset_counts(prize_id)?;
        self.persist(&state).await;
        Ok(state.registry.get(prize_id)?.into())
    }

    pub async fn reset_all_counts(&self) -> AppResult<ResetResponse> {
        let mut state = self.state.write().await;
        state.registry.reset_all_counts();
        self.persist(&state).await;
        Ok(ResetResponse {
            persons_affected: 0,
            prizes_affected: state.registry.prizes().len(),
        })
    }

    /// 重置全部数据：删除人员并清零奖项计数
    pub async fn reset_all(&self) -> AppResult<ResetResponse> {
        let mut state = self.state.write().await;
        let removed = state.pool.clear();
        state.registry.reset_all_counts();
        log::warn!("Reset all data: removed {removed} person(s)");
        self.persist(&state).await;
        Ok(ResetResponse {
            persons_affected: removed,
            prizes_affected: state.registry.prizes().len(),
        })
    }

    // -----------------------------
    // 抽奖
    // -----------------------------

    /// 预览：只抽取不提交
    pub async fn preview(&self, req: &DrawRequest) -> AppResult<DrawResultResponse> {
        let mut state = self.state.write().await;
        let LotteryState {
            pool,
            registry,
            rng,
        } = &mut *state;
        let result =
            DrawEngine::new(pool, registry, self.policy).draw(&req.prize_id, req.count, rng)?;
        Ok(DrawResultResponse::new(result, false))
    }

    /// 抽取并提交。同一奖项同一时间只有一个抽取在进行
    pub async fn draw(&self, req: &DrawRequest) -> AppResult<DrawResultResponse> {
        let _guard = self.lock_prize(&req.prize_id).await?;
        if let Some(command_id) = &req.command_id {
            log::info!(
                "Draw command {command_id} ({}) for prize {}",
                req.date_time.as_deref().unwrap_or("-"),
                req.prize_id
            );
        }

        let mut state = self.state.write().await;
        let LotteryState {
            pool,
            registry,
            rng,
        } = &mut *state;
        let result =
            DrawEngine::new(pool, registry, self.policy).draw(&req.prize_id, req.count, rng)?;
        result_recorder::commit(pool, registry, result.clone())?;

        self.persist(&state).await;
        Ok(DrawResultResponse::new(result, true))
    }

    // -----------------------------
    // 内部辅助方法
    // -----------------------------

    /// 取得奖项锁。奖项不存在时直接返回 NotFound，不在锁表中留下条目
    async fn lock_prize(&self, prize_id: &str) -> AppResult<OwnedMutexGuard<()>> {
        self.state.read().await.registry.get(prize_id)?;
        let lock = self
            .prize_locks
            .lock()
            .await
            .entry(prize_id.to_string())
            .or_default()
            .clone();
        Ok(lock.lock_owned().await)
    }

    /// 单次人数上限可配置得比 MAX_WINNERS_PER_DRAW 更小，保存时按实际上限校验
    fn check_frequency(&self, frequency: u32) -> AppResult<()> {
        if frequency > self.policy.per_draw_limit {
            return Err(AppError::ValidationError(format!(
                "Prize frequency {frequency} exceeds the per-draw limit {}",
                self.policy.per_draw_limit
            )));
        }
        Ok(())
    }

    /// 状态已在内存中生效，写盘失败只记录日志
    async fn persist(&self, state: &LotteryState) {
        let Some(store) = &self.store else {
            return;
        };
        let snapshot = Snapshot::capture(&state.pool, &state.registry);
        if let Err(e) = store.save(&snapshot).await {
            log::error!(
                "Failed to save snapshot {}: {:?}",
                store.path().display(),
                e
            );
        }
    }
}
