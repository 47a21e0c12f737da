use sea_orm::{ActiveValue::Set, entity::prelude::*};

use crate::models::Movie;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub title: String,
    pub year: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Movie {
    fn from(m: Model) -> Self {
        Movie { id: m.id, title: m.title, year: m.year }
    }
}

impl From<&Movie> for ActiveModel {
    fn from(m: &Movie) -> Self {
        ActiveModel {
            id: Set(m.id),
            title: Set(m.title.clone()),
            year: Set(m.year.clone()),
        }
    }
}
