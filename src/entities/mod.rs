// Finance
pub mod chart_of_accounts;
pub mod exchange_rate;
pub mod journal_entry;
pub mod payable;

// Procurement
pub mod goods_receipt;
pub mod purchase_order;
pub mod vendor;

// Projects
pub mod activity_log;
pub mod milestone_template;
pub mod milestone_template_item;
pub mod project;
pub mod project_milestone;
pub mod project_task;

// Engineering catalog
pub mod bom_line;
pub mod material;
pub mod service_item;

// Pricing rules
pub mod discount_policy;
pub mod overhead_allocation;
pub mod payment_term;
pub mod pricing_rule;

// Identity
pub mod refresh_token;
pub mod user;
