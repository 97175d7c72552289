//! RequestFifo entity — durable queue of deferred outbound requests

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "request_fifo")]
pub struct Model {
    /// Monotonic sequence; the total replay order.
    #[sea_orm(primary_key)]
    pub sequence: i64,

    pub connector_id: i32,

    /// OCPP action name of the deferred call.
    pub action: String,

    /// Serialized JSON payload.
    pub payload: String,

    pub enqueued_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
