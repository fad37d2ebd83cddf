pub mod category;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Result, TaxaError};

// Category engine
pub use category::{
    AncestorRef, CascadeReport, Category, CategoryId, CategoryLifecycle, CategoryPatch,
    CategoryStore, ImagePatch, JsonCategoryStore, MemoryCategoryStore, ParentPatch,
};
