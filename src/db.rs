pub mod sales_repo;
pub use sales_repo::SalesRepository;
