//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_credential_verifier;
mod cached_directory_repository;
mod postgres_directory_repository;
mod postgres_role_repository;
mod postgres_ticket_repository;
mod postgres_user_repository;

pub use argon2_credential_verifier::Argon2CredentialVerifier;
pub use cached_directory_repository::CachedDirectoryRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_ticket_repository::PostgresTicketRepository;
pub use postgres_user_repository::PostgresUserRepository;
