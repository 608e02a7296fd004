pub mod steps {
    pub mod api;
}
pub mod world;

pub use world::CertWorld;
