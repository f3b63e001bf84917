//! Read marks on pending actions (who resolved or saw what, and when).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pending_action_reads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pending_action_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub read_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pending_actions::Entity",
        from = "Column::PendingActionId",
        to = "super::pending_actions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PendingActions,
}

impl Related<super::pending_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PendingActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
