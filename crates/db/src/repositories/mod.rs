pub mod client_repo;
pub mod document_repo;
pub mod filing_repo;
pub mod notification_repo;
pub mod onboarding_file_repo;
pub mod onboarding_repo;
pub mod payment_repo;
pub mod pricing_plan_repo;
pub mod session_repo;
pub mod settings_repo;
pub mod tax_slab_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use document_repo::DocumentRepo;
pub use filing_repo::FilingRepo;
pub use notification_repo::NotificationRepo;
pub use onboarding_file_repo::OnboardingFileRepo;
pub use onboarding_repo::OnboardingRepo;
pub use payment_repo::PaymentRepo;
pub use pricing_plan_repo::PricingPlanRepo;
pub use session_repo::SessionRepo;
pub use settings_repo::SettingsRepo;
pub use tax_slab_repo::TaxSlabRepo;
pub use user_repo::UserRepo;
