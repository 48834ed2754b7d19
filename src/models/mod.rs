pub mod contractormodel;
pub mod identitymodel;
pub mod jobmodel;
pub mod profilemodel;
mod textcolumn;
