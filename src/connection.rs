//! Two-click relationship creation.
//!
//! The first click on an attribute starts a pending connection, the second
//! click on another attribute completes it. Clicking the source attribute
//! again, or pressing Escape, cancels.

use crate::error::DiagramError;
use crate::model::Endpoint;
use crate::store::DiagramStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting(Endpoint),
}

impl ConnectionState {
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting(_))
    }

    /// Source of the pending connection.
    pub fn source(&self) -> Option<&Endpoint> {
        match self {
            ConnectionState::Idle => None,
            ConnectionState::Connecting(source) => Some(source),
        }
    }

    /// Begin a connection, replacing any pending one.
    pub fn start(&mut self, source: Endpoint) {
        tracing::debug!(
            entity = %source.entity,
            attribute = %source.attribute,
            "connection started"
        );
        *self = ConnectionState::Connecting(source);
    }

    /// Finish the pending connection at `target`.
    ///
    /// Returns the `(from, to)` pair to link, or `None` when nothing was
    /// pending or the target is the source itself. Either way the state
    /// returns to idle.
    pub fn complete(&mut self, target: Endpoint) -> Option<(Endpoint, Endpoint)> {
        match std::mem::take(self) {
            ConnectionState::Idle => None,
            ConnectionState::Connecting(source) if source == target => {
                tracing::debug!("connection cancelled on its own source");
                None
            }
            ConnectionState::Connecting(source) => Some((source, target)),
        }
    }

    pub fn cancel(&mut self) -> bool {
        let was_connecting = self.is_connecting();
        *self = ConnectionState::Idle;
        was_connecting
    }
}

/// Check that both endpoints exist and are distinct.
///
/// Two attributes of the same entity may be linked; linking an attribute to
/// itself may not.
pub fn validate_connection(
    store: &DiagramStore,
    from: &Endpoint,
    to: &Endpoint,
) -> Result<(), DiagramError> {
    if from == to {
        return Err(DiagramError::SelfConnection);
    }
    for endpoint in [from, to] {
        if store.entity(endpoint.entity).is_none() {
            return Err(DiagramError::EntityNotFound(endpoint.entity));
        }
        if store.attribute(endpoint.entity, &endpoint.attribute).is_none() {
            return Err(DiagramError::AttributeNotFound {
                entity: endpoint.entity,
                attribute: endpoint.attribute.clone(),
            });
        }
    }
    Ok(())
}
