use serde::{Deserialize, Serialize};
use std::env;

/// 单次抽奖人数的系统硬上限
pub const MAX_WINNERS_PER_DRAW: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub lottery: LotteryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// 快照文件路径（None = 仅内存）
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// 已中过任一奖项的人员是否排除在其它奖项之外
    #[serde(default)]
    pub exclude_any_win: bool,
    /// 固定随机种子，便于复现
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default = "default_max_per_draw")]
    pub max_per_draw: u32,
}

fn default_max_per_draw() -> u32 {
    MAX_WINNERS_PER_DRAW
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            exclude_any_win: false,
            rng_seed: None,
            max_per_draw: MAX_WINNERS_PER_DRAW,
        }
    }
}

impl LotteryConfig {
    /// 实际生效的单次上限（不得超过系统硬上限）
    pub fn per_draw_limit(&self) -> u32 {
        self.max_per_draw.clamp(1, MAX_WINNERS_PER_DRAW)
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Config {
                server: ServerConfig {
                    host: "0.0.0.0".to_string(),
                    port: 8080,
                },
                storage: StorageConfig::default(),
                lottery: LotteryConfig::default(),
            },
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("SNAPSHOT_PATH") {
            self.storage.snapshot_path = if v.is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("LOTTERY_EXCLUDE_ANY_WIN")
            && let Ok(b) = v.parse()
        {
            self.lottery.exclude_any_win = b;
        }
        if let Ok(v) = env::var("LOTTERY_RNG_SEED")
            && let Ok(seed) = v.parse()
        {
            self.lottery.rng_seed = Some(seed);
        }
    }
}
