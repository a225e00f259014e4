//! Domain models - products with their category details, collections and users

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::CatalogError;

/// Maximum length of a product or collection name
pub const MAX_NAME_LEN: usize = 255;
/// Maximum length of a book author or a manga artist
pub const MAX_AUTHOR_LEN: usize = 255;
/// Maximum length of a language
pub const MAX_LANGUAGE_LEN: usize = 50;
/// Maximum length of a genre
pub const MAX_GENRE_LEN: usize = 100;
/// Maximum length of a game platform
pub const MAX_PLATFORM_LEN: usize = 100;

/// The discriminator of a product, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ProductCategory {
    Book,
    Manga,
    Game,
    FilmSeries,
}

impl ProductCategory {
    /// All categories in a stable order
    pub const ALL: [ProductCategory; 4] = [
        ProductCategory::Book,
        ProductCategory::Manga,
        ProductCategory::Game,
        ProductCategory::FilmSeries,
    ];

    /// The value stored in the `category` column of the base table
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Book => "Book",
            ProductCategory::Manga => "Manga",
            ProductCategory::Game => "Game",
            ProductCategory::FilmSeries => "FilmSeries",
        }
    }

    /// Label used in user facing messages
    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Book => "Book",
            ProductCategory::Manga => "Manga",
            ProductCategory::Game => "Spiel",
            ProductCategory::FilmSeries => "Film/Serie",
        }
    }

    /// The error returned when no product of this category matches an id
    pub fn not_found(&self) -> CatalogError {
        CatalogError::NotFound(format!("{} not found", self.label()))
    }
}

impl Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CatalogError::Validation(format!("unknown product category {s}")))
    }
}

/// Whether a film series entry is a single film or a series
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "film_series_kind")]
pub enum FilmSeriesKind {
    Film,
    Serie,
}

impl FilmSeriesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilmSeriesKind::Film => "Film",
            FilmSeriesKind::Serie => "Serie",
        }
    }
}

impl Display for FilmSeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilmSeriesKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Film" => Ok(FilmSeriesKind::Film),
            "Serie" => Ok(FilmSeriesKind::Serie),
            _ => Err(CatalogError::Validation(
                "Field 'art' must be either 'Film' or 'Serie'".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDetails {
    pub author: Option<String>,
    pub language: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MangaDetails {
    /// the author of a manga
    pub mangaka: Option<String>,
    pub language: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameDetails {
    /// the console or platform the game runs on
    pub platform: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmSeriesDetails {
    pub kind: Option<FilmSeriesKind>,
    pub genre: Option<String>,
}

/// The category specific part of a product, stored 1:1 next to the base record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductDetails {
    Book(BookDetails),
    Manga(MangaDetails),
    Game(GameDetails),
    FilmSeries(FilmSeriesDetails),
}

impl ProductDetails {
    /// The category these details belong to
    pub fn category(&self) -> ProductCategory {
        match self {
            ProductDetails::Book(_) => ProductCategory::Book,
            ProductDetails::Manga(_) => ProductCategory::Manga,
            ProductDetails::Game(_) => ProductCategory::Game,
            ProductDetails::FilmSeries(_) => ProductCategory::FilmSeries,
        }
    }

    /// Details of the given category with every field unset
    pub fn empty(category: ProductCategory) -> Self {
        match category {
            ProductCategory::Book => ProductDetails::Book(BookDetails::default()),
            ProductCategory::Manga => ProductDetails::Manga(MangaDetails::default()),
            ProductCategory::Game => ProductDetails::Game(GameDetails::default()),
            ProductCategory::FilmSeries => {
                ProductDetails::FilmSeries(FilmSeriesDetails::default())
            }
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        match self {
            ProductDetails::Book(b) => {
                check_len("autor", b.author.as_deref(), MAX_AUTHOR_LEN)?;
                check_len("sprache", b.language.as_deref(), MAX_LANGUAGE_LEN)?;
                check_len("genre", b.genre.as_deref(), MAX_GENRE_LEN)
            }
            ProductDetails::Manga(m) => {
                check_len("mangaka", m.mangaka.as_deref(), MAX_AUTHOR_LEN)?;
                check_len("sprache", m.language.as_deref(), MAX_LANGUAGE_LEN)?;
                check_len("genre", m.genre.as_deref(), MAX_GENRE_LEN)
            }
            ProductDetails::Game(g) => {
                check_len("konsole", g.platform.as_deref(), MAX_PLATFORM_LEN)?;
                check_len("genre", g.genre.as_deref(), MAX_GENRE_LEN)
            }
            ProductDetails::FilmSeries(f) => check_len("genre", f.genre.as_deref(), MAX_GENRE_LEN),
        }
    }
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), CatalogError> {
    match value {
        Some(v) if v.chars().count() > max => Err(CatalogError::Validation(format!(
            "Field '{field}' must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// The input of a create or update, before it was validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub sequence_number: Option<i32>,
    pub details: ProductDetails,
}

impl ProductDraft {
    /// Rejects drafts that must never reach storage
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Field 'name' is required".to_string(),
            ));
        }
        check_len("name", Some(&self.name), MAX_NAME_LEN)?;
        self.details.validate()
    }

    pub fn category(&self) -> ProductCategory {
        self.details.category()
    }
}

/// A stored product merged with its details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sequence_number: Option<i32>,
    pub details: ProductDetails,
}

impl Product {
    pub fn category(&self) -> ProductCategory {
        self.details.category()
    }
}

/// A product as read from storage; `details` is [None] when the detail row is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub sequence_number: Option<i32>,
    pub category: ProductCategory,
    pub details: Option<ProductDetails>,
}

impl ProductRecord {
    /// Merge into a [Product], falling back to empty details for a missing detail row
    pub fn into_product_or_empty(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            sequence_number: self.sequence_number,
            details: self
                .details
                .unwrap_or_else(|| ProductDetails::empty(self.category)),
        }
    }
}

/// The base record of a product, used when listing collection members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "nummer")]
    pub sequence_number: Option<i32>,
    #[serde(rename = "art")]
    pub category: ProductCategory,
}

/// Result of a delete filtered by id and category (and owner for collections)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyAbsent,
}

impl From<bool> for DeleteOutcome {
    fn from(deleted: bool) -> Self {
        if deleted {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::AlreadyAbsent
        }
    }
}

/// A user owned, named group of products
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: Uuid,
    pub owner_id: String,
    pub name: Option<String>,
}

/// A collection, optionally with its member products
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDetail {
    pub collection: Collection,
    /// [None] unless members were requested
    pub products: Option<Vec<ProductSummary>>,
}

/// What a membership edit did, as seen by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// The pair was inserted or removed
    Applied,
    /// The pair was already present (add) or already absent (remove)
    Unchanged,
    /// No collection with that id belongs to the caller
    CollectionNotFound,
    /// The product to add does not exist
    ProductNotFound,
}

/// A locally known user, keyed by the identity provider's subject id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
}

/// The result of verifying a bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    /// may be empty when the provider did not supply a usable name
    pub display_name: String,
}
