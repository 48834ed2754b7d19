pub mod contractordb;
pub mod db;
pub mod identitydb;
pub mod jobdb;
pub mod profiledb;
