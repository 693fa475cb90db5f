use serde::{Deserialize, Serialize};

/// Карточка фильма из списка GET /movies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub name: String,
    #[serde(rename = "posterUrl")]
    pub poster_url: Option<String>,
    pub genre: Option<String>,
}

/// Кинотеатр из списка GET /theaters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theater {
    pub id: String,
    pub name: String,
    pub location: String,
}
