use crate::entities::site_content_entity::{self as site_contents, SINGLETON_ID};
use crate::error::AppResult;
use crate::models::{SiteContentForm, SiteContentResponse};
use crate::utils::non_blank;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

#[derive(Clone)]
pub struct SiteContentService {
    pool: DatabaseConnection,
}

fn default_content() -> site_contents::ActiveModel {
    let text = |v: &str| Set(v.to_string());
    site_contents::ActiveModel {
        id: Set(SINGLETON_ID),
        slogan: text("Discover the world with us"),
        description: text("Hand-picked tours, trusted hotels and honest prices."),
        advantage1_title: text("Best prices"),
        advantage1_text: text("We compare offers so you do not have to."),
        advantage2_title: text("Trusted hotels"),
        advantage2_text: text("Every hotel in our catalog is checked by our team."),
        advantage3_title: text("Flexible tours"),
        advantage3_text: text("Pick the duration, meals and extras that suit you."),
        advantage4_title: text("Support"),
        advantage4_text: text("Our managers are with you before and during the trip."),
    }
}

impl SiteContentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Seeds the singleton row if it is missing.
    pub async fn ensure_default(&self) -> AppResult<site_contents::Model> {
        if let Some(m) = site_contents::Entity::find_by_id(SINGLETON_ID)
            .one(&self.pool)
            .await?
        {
            return Ok(m);
        }
        let model = default_content().insert(&self.pool).await?;
        log::info!("Seeded default homepage content");
        Ok(model)
    }

    pub async fn get(&self) -> AppResult<SiteContentResponse> {
        Ok(self.ensure_default().await?.into())
    }

    /// Blank fields keep their current text.
    pub async fn update(&self, form: SiteContentForm) -> AppResult<SiteContentResponse> {
        let mut model = self.ensure_default().await?.into_active_model();

        let fields = [
            (&mut model.slogan, form.slogan),
            (&mut model.description, form.description),
            (&mut model.advantage1_title, form.advantage1_title),
            (&mut model.advantage1_text, form.advantage1_text),
            (&mut model.advantage2_title, form.advantage2_title),
            (&mut model.advantage2_text, form.advantage2_text),
            (&mut model.advantage3_title, form.advantage3_title),
            (&mut model.advantage3_text, form.advantage3_text),
            (&mut model.advantage4_title, form.advantage4_title),
            (&mut model.advantage4_text, form.advantage4_text),
        ];
        for (column, value) in fields {
            if let Some(value) = non_blank(value.as_deref()) {
                *column = Set(value);
            }
        }

        let updated = model.update(&self.pool).await?;
        log::info!("Homepage content updated");
        Ok(updated.into())
    }
}
