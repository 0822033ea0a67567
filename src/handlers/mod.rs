pub mod accounts;
pub mod catalog;
pub mod common;
pub mod currencies;
pub mod journal;
pub mod milestones;
pub mod payables;
pub mod pricing;
pub mod procurement;
pub mod projects;
pub mod reports;
pub mod users;
pub mod vendors;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub accounts: Arc<crate::services::accounts::ChartOfAccountsService>,
    pub journal: Arc<crate::services::journal::JournalService>,
    pub reports: Arc<crate::services::reports::ReportService>,
    pub vendors: Arc<crate::services::vendors::VendorService>,
    pub payables: Arc<crate::services::payables::PayableService>,
    pub procurement: Arc<crate::services::procurement::ProcurementService>,
    pub projects: Arc<crate::services::projects::ProjectService>,
    pub milestones: Arc<crate::services::milestones::MilestoneService>,
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub currencies: Arc<crate::services::currencies::CurrencyService>,
    pub bom: Arc<crate::services::bom::BomService>,
    pub pricing: Arc<crate::services::pricing::PricingService>,
    pub users: Arc<crate::services::users::UserService>,
}

impl AppServices {
    /// Builds the service container over a shared pool and event channel.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let accounts = Arc::new(crate::services::accounts::ChartOfAccountsService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let journal = Arc::new(crate::services::journal::JournalService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let reports = Arc::new(crate::services::reports::ReportService::new(db_pool.clone()));
        let vendors = Arc::new(crate::services::vendors::VendorService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let payables = Arc::new(crate::services::payables::PayableService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let procurement = Arc::new(crate::services::procurement::ProcurementService::new(
            db_pool.clone(),
            event_sender.clone(),
            payables.clone(),
        ));
        let projects = Arc::new(crate::services::projects::ProjectService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let milestones = Arc::new(crate::services::milestones::MilestoneService::new(
            db_pool.clone(),
            event_sender.clone(),
            projects.clone(),
        ));
        let catalog = Arc::new(crate::services::catalog::CatalogService::new(db_pool.clone()));
        let currencies = Arc::new(crate::services::currencies::CurrencyService::new(
            db_pool.clone(),
        ));
        let bom = Arc::new(crate::services::bom::BomService::new(
            db_pool.clone(),
            event_sender,
        ));
        let pricing = Arc::new(crate::services::pricing::PricingService::new(db_pool.clone()));
        let users = Arc::new(crate::services::users::UserService::new(db_pool));

        Self {
            accounts,
            journal,
            reports,
            vendors,
            payables,
            procurement,
            projects,
            milestones,
            catalog,
            currencies,
            bom,
            pricing,
            users,
        }
    }
}
