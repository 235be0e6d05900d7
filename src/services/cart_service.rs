use crate::entities::{cart_entity as carts, cart_item_entity as cart_items, tour_entity as tours};
use crate::error::{AppError, AppResult};
use crate::models::{CartAck, CartLine, CartView, TourResponse};
use crate::services::load_tour_details;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
}

impl CartService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取用户购物车（不存在则创建）
    pub async fn get_or_create_cart(&self, user_id: i64) -> AppResult<carts::Model> {
        let cart = ensure_cart(&self.pool, user_id).await?;
        Ok(cart)
    }

    /// 加入购物车
    ///
    /// 逻辑:
    /// 1. 确认旅游产品存在
    /// 2. 取得或创建购物车
    /// 3. 已有行则原子 quantity + 1, 否则插入 quantity = 1
    ///
    /// All three steps share one transaction.
    pub async fn add_to_cart(&self, user_id: i64, tour_id: i64) -> AppResult<CartAck> {
        let txn = self.pool.begin().await?;

        if tours::Entity::find_by_id(tour_id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Err(AppError::NotFound("Tour not found".to_string()));
        }

        let cart = ensure_cart(&txn, user_id).await?;

        let bumped = cart_items::Entity::update_many()
            .col_expr(
                cart_items::Column::Quantity,
                Expr::col(cart_items::Column::Quantity).add(1),
            )
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::TourId.eq(tour_id))
            .exec(&txn)
            .await?;

        let item = if bumped.rows_affected == 0 {
            cart_items::ActiveModel {
                cart_id: Set(cart.id),
                tour_id: Set(tour_id),
                quantity: Set(1),
                added_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        } else {
            cart_items::Entity::find()
                .filter(cart_items::Column::CartId.eq(cart.id))
                .filter(cart_items::Column::TourId.eq(tour_id))
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError("cart item disappeared after update".to_string())
                })?
        };

        txn.commit().await?;

        log::info!(
            "User {} added tour {} to cart (quantity {})",
            user_id,
            tour_id,
            item.quantity
        );
        Ok(CartAck {
            item_id: Some(item.id),
            quantity: item.quantity,
        })
    }

    /// Removes a whole line from the user's own cart. Unknown ids (or lines
    /// in someone else's cart) are a no-op; returns the number of rows removed.
    pub async fn remove_from_cart(&self, user_id: i64, item_id: i64) -> AppResult<u64> {
        let Some(cart) = self.find_cart(user_id).await? else {
            return Ok(0);
        };

        let res = cart_items::Entity::delete_many()
            .filter(cart_items::Column::Id.eq(item_id))
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&self.pool)
            .await?;

        if res.rows_affected == 0 {
            log::debug!("Cart item {item_id} not in cart of user {user_id}, nothing removed");
        }
        Ok(res.rows_affected)
    }

    /// A missing cart reads as an empty one; nothing is created.
    pub async fn view_cart(&self, user_id: i64) -> AppResult<CartView> {
        let Some(cart) = self.find_cart(user_id).await? else {
            return Ok(CartView::empty());
        };

        let items = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .order_by_asc(cart_items::Column::Id)
            .all(&self.pool)
            .await?;
        if items.is_empty() {
            return Ok(CartView::empty());
        }

        let tour_ids: Vec<i64> = items.iter().map(|i| i.tour_id).collect();
        let tour_models = tours::Entity::find()
            .filter(tours::Column::Id.is_in(tour_ids))
            .all(&self.pool)
            .await?;
        let tour_map: HashMap<i64, TourResponse> = load_tour_details(&self.pool, tour_models)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let Some(tour) = tour_map.get(&item.tour_id).cloned() else {
                continue;
            };
            let line_total_cents = tour
                .price_cents
                .checked_mul(i64::from(item.quantity))
                .ok_or_else(|| {
                    AppError::InternalError(format!("Cart line {} total overflows", item.id))
                })?;
            lines.push(CartLine {
                item_id: item.id,
                quantity: item.quantity,
                line_total_cents,
                tour,
            });
        }

        CartView::from_lines(lines)
    }

    async fn find_cart(&self, user_id: i64) -> AppResult<Option<carts::Model>> {
        let cart = carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        Ok(cart)
    }
}

async fn ensure_cart<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<carts::Model, sea_orm::DbErr> {
    if let Some(cart) = carts::Entity::find()
        .filter(carts::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        return Ok(cart);
    }
    carts::ActiveModel {
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
}
