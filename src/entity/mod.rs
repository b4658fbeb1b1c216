pub mod audit_logs;
pub mod bien_paniers;
pub mod media;
pub mod paniers;
pub mod properties;
pub mod roles;
pub mod user_roles;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use bien_paniers::Entity as BienPaniers;
pub use media::Entity as Media;
pub use paniers::Entity as Paniers;
pub use properties::Entity as Properties;
pub use roles::Entity as Roles;
pub use user_roles::Entity as UserRoles;
pub use users::Entity as Users;
