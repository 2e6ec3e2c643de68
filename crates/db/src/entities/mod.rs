//! `SeaORM` entity definitions.

pub mod resources;
pub mod sea_orm_active_enums;
