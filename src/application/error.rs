use crate::domain::error::DomainError;
use crate::domain::port::{CreateOrderError, RepositoryError, StockShortage};
use crate::domain::service::CouponEvaluationError;

/// アプリケーション層のエラー型
/// ドメインエラー、リポジトリエラー、在庫不足をラップする
#[derive(Debug)]
pub enum ApplicationError {
    /// ドメインエラー（ビジネスルール違反）
    DomainError(DomainError),
    /// リポジトリエラー（永続化の失敗）
    RepositoryError(RepositoryError),
    /// 在庫不足（不足した行の内訳つき）
    InsufficientStock(Vec<StockShortage>),
    /// エンティティが見つからない
    NotFound(String),
}

impl std::fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationError::DomainError(err) => write!(f, "Domain error: {}", err),
            ApplicationError::RepositoryError(err) => write!(f, "Repository error: {}", err),
            ApplicationError::InsufficientStock(shortages) => {
                write!(f, "Insufficient stock for {} line(s)", shortages.len())
            }
            ApplicationError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for ApplicationError {}

// From実装でエラー変換を簡潔に
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        ApplicationError::DomainError(err)
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        ApplicationError::RepositoryError(err)
    }
}

impl From<CouponEvaluationError> for ApplicationError {
    fn from(err: CouponEvaluationError) -> Self {
        match err {
            CouponEvaluationError::Domain(e) => ApplicationError::DomainError(e),
            CouponEvaluationError::Repository(e) => ApplicationError::RepositoryError(e),
        }
    }
}

impl From<CreateOrderError> for ApplicationError {
    fn from(err: CreateOrderError) -> Self {
        match err {
            CreateOrderError::InsufficientStock(shortages) => {
                ApplicationError::InsufficientStock(shortages)
            }
            CreateOrderError::DuplicateOrderNumber => ApplicationError::RepositoryError(
                RepositoryError::OperationFailed("注文番号の採番に失敗しました".to_string()),
            ),
            CreateOrderError::Repository(e) => ApplicationError::RepositoryError(e),
        }
    }
}
