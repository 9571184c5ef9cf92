pub mod catalogs;
pub mod rewrite;
