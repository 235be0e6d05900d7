use crate::entities::site_content_entity as site_contents;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Advantage {
    pub title: String,
    pub text: String,
}

/// Homepage marketing copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteContentResponse {
    pub slogan: String,
    pub description: String,
    pub advantages: Vec<Advantage>,
}

impl From<site_contents::Model> for SiteContentResponse {
    fn from(m: site_contents::Model) -> Self {
        let advantage = |title: String, text: String| Advantage { title, text };
        Self {
            slogan: m.slogan,
            description: m.description,
            advantages: vec![
                advantage(m.advantage1_title, m.advantage1_text),
                advantage(m.advantage2_title, m.advantage2_text),
                advantage(m.advantage3_title, m.advantage3_text),
                advantage(m.advantage4_title, m.advantage4_text),
            ],
        }
    }
}
