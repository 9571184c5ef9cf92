pub mod catalogs;
pub mod rewrite;
pub mod root;
