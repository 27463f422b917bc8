// src/dag/payload.rs

//! How a node's payload describes itself in a snapshot.

use std::rc::Rc;
use std::sync::Arc;

/// Identification for payloads that cannot (or should not) be serialized.
///
/// Only these two strings make it into a [`super::GraphSnapshot`]; the
/// payload itself never does.
pub trait NodePayload {
    /// Tag naming the kind of work. Defaults to the short Rust type name.
    fn type_tag(&self) -> Option<String> {
        Some(short_type_name::<Self>().to_string())
    }

    /// Identifier of this particular payload, if it has one.
    fn payload_id(&self) -> Option<String> {
        None
    }
}

/// `my_crate::jobs::Fetch<u8>` becomes `Fetch`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl NodePayload for String {
    fn payload_id(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl NodePayload for str {
    fn type_tag(&self) -> Option<String> {
        Some("str".to_string())
    }

    fn payload_id(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl NodePayload for () {
    fn type_tag(&self) -> Option<String> {
        None
    }
}

impl<P: NodePayload + ?Sized> NodePayload for &P {
    fn type_tag(&self) -> Option<String> {
        (**self).type_tag()
    }

    fn payload_id(&self) -> Option<String> {
        (**self).payload_id()
    }
}

impl<P: NodePayload + ?Sized> NodePayload for Box<P> {
    fn type_tag(&self) -> Option<String> {
        (**self).type_tag()
    }

    fn payload_id(&self) -> Option<String> {
        (**self).payload_id()
    }
}

impl<P: NodePayload + ?Sized> NodePayload for Rc<P> {
    fn type_tag(&self) -> Option<String> {
        (**self).type_tag()
    }

    fn payload_id(&self) -> Option<String> {
        (**self).payload_id()
    }
}

impl<P: NodePayload + ?Sized> NodePayload for Arc<P> {
    fn type_tag(&self) -> Option<String> {
        (**self).type_tag()
    }

    fn payload_id(&self) -> Option<String> {
        (**self).payload_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scorer;
    impl NodePayload for Scorer {}

    #[test]
    fn default_tag_is_short_type_name() {
        assert_eq!(Scorer.type_tag().as_deref(), Some("Scorer"));
        assert_eq!(Scorer.payload_id(), None);
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn smart_pointers_delegate() {
        let shared = Arc::new(Scorer);
        assert_eq!(shared.type_tag().as_deref(), Some("Scorer"));

        let boxed: Box<str> = "job-7".into();
        assert_eq!(boxed.payload_id().as_deref(), Some("job-7"));
    }

    #[test]
    fn unit_payload_has_no_tag() {
        assert_eq!(().type_tag(), None);
        assert_eq!("x".to_string().type_tag().as_deref(), Some("String"));
    }
}
