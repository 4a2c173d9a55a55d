use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// 引擎对外的错误种类（与语言无关，展示文案由前端负责本地化）
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Draw limit exceeded: requested {requested}, limit {limit}")]
    DrawLimitExceeded { requested: u32, limit: u32 },

    #[error("Prize exhausted: {0}")]
    PrizeExhausted(String),

    #[error("Insufficient candidates: needed {needed}, available {available}")]
    InsufficientCandidates { needed: u32, available: u32 },

    #[error("Overdraw on prize {prize_id}: requested {requested}, remaining {remaining}")]
    Overdraw {
        prize_id: String,
        requested: u32,
        remaining: u32,
    },

    #[error("Commit error: {0}")]
    CommitError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    /// 机器可读的错误码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DrawLimitExceeded { .. } => "DRAW_LIMIT_EXCEEDED",
            AppError::PrizeExhausted(_) => "PRIZE_EXHAUSTED",
            AppError::InsufficientCandidates { .. } => "INSUFFICIENT_CANDIDATES",
            AppError::Overdraw { .. } => "OVERDRAW",
            AppError::CommitError(_) => "COMMIT_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;

        let (status_code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::DrawLimitExceeded { .. } => {
                log::warn!("{self}");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::PrizeExhausted(_) | AppError::InsufficientCandidates { .. } => {
                log::warn!("{self}");
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::Overdraw { .. } => {
                // 说明上游漏掉了排除校验，属于程序错误
                log::error!("Consistency violation: {self}");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::CommitError(msg) => {
                log::error!("Commit rolled back: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        }))
    }
}
