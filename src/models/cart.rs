use crate::error::{AppError, AppResult};
use crate::models::TourResponse;
use crate::utils::format_cents;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CartLine {
    pub item_id: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
    pub tour: TourResponse,
}

/// Cart contents; a user without a cart gets an empty one with zero total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_cents: i64,
    pub total: String,
}

impl CartView {
    /// total = Σ price × quantity over exactly these lines
    pub fn from_lines(items: Vec<CartLine>) -> AppResult<Self> {
        let total_cents = items
            .iter()
            .try_fold(0i64, |acc, line| acc.checked_add(line.line_total_cents))
            .ok_or_else(|| AppError::InternalError("Cart total overflows".to_string()))?;
        Ok(Self {
            items,
            total_cents,
            total: format_cents(total_cents),
        })
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_cents: 0,
            total: format_cents(0),
        }
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|line| i64::from(line.quantity)).sum()
    }
}

/// Acknowledgment returned by the asynchronous cart actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CartAck {
    pub item_id: Option<i64>,
    pub quantity: i32,
}
