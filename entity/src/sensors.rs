use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "MAPPED_SENSORS_DATA")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_name = "_sensors_type")]
    pub sensors_type: Option<String>,
    #[sea_orm(column_name = "_number_of_sensors")]
    pub number_of_sensors: Option<i32>,
    /// Added empty at 1.3.2, nothing backfills it.
    #[sea_orm(column_name = "_usable")]
    pub usable: Option<String>,
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
