use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "MAPPED_CONNECTIVITY_DATA")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_name = "_number_of_regions")]
    pub number_of_regions: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_types::Entity",
        from = "Column::Id",
        to = "super::data_types::Column::Id",
        on_delete = "Cascade"
    )]
    DataTypes,
}

impl Related<super::data_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
