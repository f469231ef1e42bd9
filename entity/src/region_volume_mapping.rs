use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "MAPPED_REGION_VOLUME_MAPPING_DATA")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_name = "_connectivity")]
    pub connectivity: Option<String>,
    #[sea_orm(column_name = "_volume")]
    pub volume: Option<String>,
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
