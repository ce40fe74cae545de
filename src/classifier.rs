use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cell::CellValue;
use crate::error::ConfigError;
use crate::normalize::{normalize_cell, normalize_name};
use crate::registry::CustomerRegistry;

/// Table name prefixes used for the garden, upper and lower lawn tables.
const WALK_IN_PREFIXES: [&str; 3] = ["GL-", "UL-", "LL-"];

/// Online delivery orders.
const DELIVERY: &str = "OD";

const ROOM_REFERENCE: &str = "Matsya - Room";
const ROOM_MARKER: &str = "Room ";
const ROOM_CUSTOMER: &str = "Matsya Guest - Room ";

/// Table names that bill to a different customer than their name suggests.
const ALIASES: [(&str, &str); 6] = [
    ("Manta Ray", "Matsya Guest - Room 8"),
    ("Sting Ray", "Matsya Guest - Room 9"),
    ("Matsya Guest Breakfast", "Island Quest"),
    ("Matsya Staff Meals", "Island Quest"),
    ("Ray Homes Breakfast", "Havelock Experience"),
    ("CH Staff Meals", "Captain Hooks"),
];

/// Why a table name ended up on the fallback customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    InvalidFormat,
    UnknownRoom,
    UnparsedRoom,
    UnknownTableName,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FallbackReason::InvalidFormat => "invalid table name format",
            FallbackReason::UnknownRoom => "unknown room number",
            FallbackReason::UnparsedRoom => "unable to parse room number",
            FallbackReason::UnknownTableName => "unknown table name",
        })
    }
}

/// Receives data quality findings from the classifier.
pub trait Diagnostics {
    fn fallback(&self, reason: FallbackReason, value: &str);
}

/// Reports fallbacks as `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn fallback(&self, reason: FallbackReason, value: &str) {
        warn!(%reason, value, "using the default customer");
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoomParseError {
    #[error("no room marker")]
    NoRoomMarker,
    #[error("empty room number")]
    EmptyToken,
}

/// Room number of a `... Room <n>` table name: whatever follows the last
/// `Room ` marker, trimmed.
pub fn parse_room_token(name: &str) -> Result<&str, RoomParseError> {
    let (_, token) = name
        .rsplit_once(ROOM_MARKER)
        .ok_or(RoomParseError::NoRoomMarker)?;

    match token.trim() {
        "" => Err(RoomParseError::EmptyToken),
        token => Ok(token),
    }
}

/// Maps point-of-sale table names onto customers of the accounting system.
///
/// Rules are tried in order, first match wins:
/// 1. non-text cells go to the fallback customer
/// 2. lawn tables (`GL-`, `UL-`, `LL-`) and delivery (`OD`) are walk-ins
/// 3. `Matsya - Room <n>` bills the guest of room `<n>`
/// 4. a handful of fixed aliases
/// 5. any registry name, verbatim
///
/// Everything else lands on the fallback customer. Classification never fails.
#[derive(Debug)]
pub struct CustomerClassifier<D = TracingDiagnostics> {
    registry: Arc<CustomerRegistry>,
    aliases: Vec<(&'static str, String)>,
    diagnostics: D,
}

impl<D: Diagnostics> CustomerClassifier<D> {
    /// Fails when the registry lacks a customer one of the aliases bills to.
    pub fn new(registry: Arc<CustomerRegistry>, diagnostics: D) -> Result<Self, ConfigError> {
        let aliases = ALIASES
            .iter()
            .map(|&(alias, target)| {
                registry
                    .get(target)
                    .map(|id| (alias, id.to_string()))
                    .ok_or_else(|| ConfigError::MissingCustomer(target.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            registry,
            aliases,
            diagnostics,
        })
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn classify(&self, table_name: &CellValue) -> &str {
        let CellValue::Text(raw) = table_name else {
            return self.fall_back(FallbackReason::InvalidFormat, &normalize_cell(table_name));
        };
        self.classify_name(raw)
    }

    pub fn classify_name(&self, raw: &str) -> &str {
        let name = normalize_name(raw);

        if WALK_IN_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) || name == DELIVERY {
            return self.registry.fallback_id();
        }

        if name.contains(ROOM_REFERENCE) {
            return self.room_customer(&name);
        }

        if let Some((_, id)) = self.aliases.iter().find(|(alias, _)| *alias == name) {
            return id;
        }

        match self.registry.get(&name) {
            Some(id) => id,
            None => self.fall_back(FallbackReason::UnknownTableName, &name),
        }
    }

    fn room_customer(&self, name: &str) -> &str {
        match parse_room_token(name) {
            Ok(room) => {
                let key = normalize_name(&format!("{ROOM_CUSTOMER}{room}"));
                match self.registry.get(&key) {
                    Some(id) => id,
                    None => self.fall_back(FallbackReason::UnknownRoom, name),
                }
            }
            Err(err) => {
                debug!(%err, name, "room reference without a room number");
                self.fall_back(FallbackReason::UnparsedRoom, name)
            }
        }
    }

    fn fall_back(&self, reason: FallbackReason, value: &str) -> &str {
        self.diagnostics.fallback(reason, value);
        self.registry.fallback_id()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::registry::Deployment;

    const WALK_INS: &str = "4947c933-8e0e-4158-8cf0-336ccfa1a540";
    const ROOM_3: &str = "3c2efa29-cf72-4944-aa67-1a170c135c00";
    const ROOM_9: &str = "199b6759-5d86-4a8e-b0e2-30a696b8fc89";
    const ISLAND_QUEST: &str = "969788ce-f0f7-4928-a92e-d1cb3cefe140";

    #[derive(Default)]
    struct Recorded(RefCell<Vec<(FallbackReason, String)>>);

    impl Diagnostics for Recorded {
        fn fallback(&self, reason: FallbackReason, value: &str) {
            self.0.borrow_mut().push((reason, value.to_string()));
        }
    }

    impl Recorded {
        fn take(&self) -> Vec<(FallbackReason, String)> {
            self.0.take()
        }
    }

    fn classifier() -> CustomerClassifier<Recorded> {
        let deployment = Deployment::builtin().unwrap();
        CustomerClassifier::new(deployment.registry, Recorded::default()).unwrap()
    }

    #[test]
    fn lawn_tables_and_delivery_are_walk_ins() {
        let c = classifier();
        for name in ["GL-1", "UL-12", "LL-3", "OD", " OD\u{00A0}"] {
            assert_eq!(c.classify_name(name), WALK_INS, "{name}");
        }
        assert!(c.diagnostics().take().is_empty());
    }

    #[test]
    fn prefix_rule_beats_exact_registry_match() {
        let registry = CustomerRegistry::new(
            [
                ("Walk-ins", "walk"),
                ("GL-Table5", "garden"),
                ("Matsya Guest - Room 8", "r8"),
                ("Matsya Guest - Room 9", "r9"),
                ("Island Quest", "iq"),
                ("Havelock Experience", "hx"),
                ("Captain Hooks", "ch"),
            ],
            "Walk-ins",
        )
        .unwrap();
        let c = CustomerClassifier::new(Arc::new(registry), Recorded::default()).unwrap();
        assert_eq!(c.classify_name("GL-Table5"), "walk");
    }

    #[test]
    fn room_references_resolve_to_the_room_guest() {
        let c = classifier();
        assert_eq!(c.classify_name("Matsya - Room 3"), ROOM_3);
        assert_eq!(c.classify_name("Matsya - Room\u{00A0}3"), ROOM_3);
        assert_eq!(
            c.classify_name("Matsya - Room 3"),
            c.classify_name("Matsya Guest - Room 3")
        );
        assert!(c.diagnostics().take().is_empty());
    }

    #[test]
    fn unknown_room_falls_back_with_a_diagnostic() {
        let c = classifier();
        assert_eq!(c.classify_name("Matsya - Room 99"), WALK_INS);
        assert_eq!(
            c.diagnostics().take(),
            [(FallbackReason::UnknownRoom, "Matsya - Room 99".to_string())]
        );
    }

    #[test]
    fn room_reference_without_number_falls_back() {
        let c = classifier();
        assert_eq!(c.classify_name("Matsya - Room"), WALK_INS);
        assert_eq!(c.classify_name("Matsya - Room   "), WALK_INS);
        let reasons = c
            .diagnostics()
            .take()
            .into_iter()
            .map(|(reason, _)| reason)
            .collect::<Vec<_>>();
        assert_eq!(reasons, [FallbackReason::UnparsedRoom, FallbackReason::UnparsedRoom]);
    }

    #[test]
    fn aliases_share_their_target_identifier() {
        let c = classifier();
        assert_eq!(c.classify_name("Manta Ray"), c.classify_name("Matsya Guest - Room 8"));
        assert_eq!(c.classify_name("Sting Ray"), ROOM_9);
        assert_eq!(c.classify_name("Sting Ray"), c.classify_name("Matsya Guest - Room 9"));
        assert_eq!(c.classify_name("Matsya Guest Breakfast"), ISLAND_QUEST);
        assert_eq!(c.classify_name("Matsya Staff Meals"), ISLAND_QUEST);
        assert_eq!(
            c.classify_name("Ray Homes Breakfast"),
            c.classify_name("Havelock Experience")
        );
        assert_eq!(c.classify_name("CH Staff Meals"), c.classify_name("Captain Hooks"));
    }

    #[test]
    fn registry_names_match_after_normalization() {
        let c = classifier();
        assert_eq!(
            c.classify_name("\u{00A0}Abdul Haseeb "),
            "fc23947d-05d6-418e-ba5c-06cf1ed785c8"
        );
        assert!(c.diagnostics().take().is_empty());
    }

    #[test]
    fn unknown_names_fall_back_with_a_diagnostic() {
        let c = classifier();
        assert_eq!(c.classify_name(" Rooftop 4 "), WALK_INS);
        assert_eq!(
            c.diagnostics().take(),
            [(FallbackReason::UnknownTableName, "Rooftop 4".to_string())]
        );
    }

    #[test]
    fn non_text_cells_are_invalid_format() {
        let c = classifier();
        assert_eq!(c.classify(&CellValue::Number(5.0)), WALK_INS);
        assert_eq!(
            c.diagnostics().take(),
            [(FallbackReason::InvalidFormat, "5".to_string())]
        );
    }

    #[test]
    fn classification_is_total() {
        let c = classifier();
        for name in ["", " ", "\u{00A0}", "日本語", "Room ", "Matsya - Room Room ", "🍽️"] {
            assert!(!c.classify_name(name).is_empty(), "{name:?}");
        }
    }

    #[test]
    fn missing_alias_target_is_a_config_error() {
        let registry = CustomerRegistry::new([("Walk-ins", "w")], "Walk-ins").unwrap();
        let err = CustomerClassifier::new(Arc::new(registry), TracingDiagnostics).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCustomer(name) if name == "Matsya Guest - Room 8"));
    }

    #[test]
    fn room_tokens() {
        assert_eq!(parse_room_token("Matsya - Room 3"), Ok("3"));
        assert_eq!(parse_room_token("Matsya - Room Room 7 "), Ok("7"));
        assert_eq!(parse_room_token("Matsya - Room"), Err(RoomParseError::NoRoomMarker));
        assert_eq!(parse_room_token("Matsya - Room  "), Err(RoomParseError::EmptyToken));
    }
}
