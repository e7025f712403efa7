use serde::{Deserialize, Deserializer, Serialize};

use crate::tab::{TabIdentifier, TabProperties};

// ---------------------------------------------------------------------------
// Layout service → client events
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LayoutEvent {
    JoinTabGroup(JoinTabGroup),
    LeaveTabGroup(TabGroupEvent),
    TabActivated(TabGroupEvent),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroupEvent {
    pub tab_group_id: String,
    #[serde(rename = "tabID")]
    pub tab_id: TabIdentifier,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTabGroup {
    pub tab_group_id: String,
    #[serde(rename = "tabID")]
    pub tab_id: TabIdentifier,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tab_props: TabProperties,
    #[serde(default, deserialize_with = "clamped_index")]
    pub index: usize,
}

/// `tabProps` may be sent as null; treat it like an absent field.
fn null_as_default<'de, D>(deserializer: D) -> Result<TabProperties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TabProperties>::deserialize(deserializer)?.unwrap_or_default())
}

/// Negative or null indices insert at the front.
fn clamped_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let index = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
    Ok(usize::try_from(index).unwrap_or(0))
}

impl LayoutEvent {
    pub fn tab_group_id(&self) -> &str {
        match self {
            LayoutEvent::JoinTabGroup(e) => &e.tab_group_id,
            LayoutEvent::LeaveTabGroup(e) | LayoutEvent::TabActivated(e) => &e.tab_group_id,
        }
    }

    pub fn tab_id(&self) -> &TabIdentifier {
        match self {
            LayoutEvent::JoinTabGroup(e) => &e.tab_id,
            LayoutEvent::LeaveTabGroup(e) | LayoutEvent::TabActivated(e) => &e.tab_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Client → layout service commands
// ---------------------------------------------------------------------------

/// Whole-group window command, addressed through any member of the group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GroupCommand {
    MinimizeGroup {
        #[serde(rename = "tabID")]
        tab_id: TabIdentifier,
    },
    MaximizeGroup {
        #[serde(rename = "tabID")]
        tab_id: TabIdentifier,
    },
    RestoreGroup {
        #[serde(rename = "tabID")]
        tab_id: TabIdentifier,
    },
    CloseGroup {
        #[serde(rename = "tabID")]
        tab_id: TabIdentifier,
    },
}

impl GroupCommand {
    pub fn name(&self) -> &'static str {
        match self {
            GroupCommand::MinimizeGroup { .. } => "minimize-group",
            GroupCommand::MaximizeGroup { .. } => "maximize-group",
            GroupCommand::RestoreGroup { .. } => "restore-group",
            GroupCommand::CloseGroup { .. } => "close-group",
        }
    }

    pub fn tab_id(&self) -> &TabIdentifier {
        match self {
            GroupCommand::MinimizeGroup { tab_id }
            | GroupCommand::MaximizeGroup { tab_id }
            | GroupCommand::RestoreGroup { tab_id }
            | GroupCommand::CloseGroup { tab_id } => tab_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Sent once after connecting; `window` names this window when known.
    Hello { window: Option<TabIdentifier> },
    Command(GroupCommand),
    Goodbye,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ServiceMessage {
    Event(LayoutEvent),
    Error(String),
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_event_wire_format() {
        let json = r#"{
            "type": "join-tab-group",
            "tabGroupId": "group-1",
            "tabID": {"name": "A", "uuid": "1"},
            "tabProps": {"title": "App A"},
            "index": 2
        }"#;
        let event: LayoutEvent = serde_json::from_str(json).unwrap();
        match event {
            LayoutEvent::JoinTabGroup(join) => {
                assert_eq!(join.tab_group_id, "group-1");
                assert_eq!(join.tab_id, TabIdentifier::new("A", "1"));
                assert_eq!(join.tab_props.title.as_deref(), Some("App A"));
                assert_eq!(join.index, 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_join_event_defaults_props_and_index() {
        let json = r#"{"type":"join-tab-group","tabGroupId":"g","tabID":{"name":"A","uuid":"1"}}"#;
        let event: LayoutEvent = serde_json::from_str(json).unwrap();
        let LayoutEvent::JoinTabGroup(join) = event else {
            panic!("expected join");
        };
        assert_eq!(join.index, 0);
        assert_eq!(join.tab_props, TabProperties::default());
    }

    #[test]
    fn test_join_negative_index_prepends() {
        let json = r#"{"type":"join-tab-group","tabGroupId":"g","tabID":{"name":"A","uuid":"1"},"index":-1}"#;
        let event: LayoutEvent = serde_json::from_str(json).unwrap();
        let LayoutEvent::JoinTabGroup(join) = event else {
            panic!("expected join");
        };
        assert_eq!(join.index, 0);
    }

    #[test]
    fn test_join_null_props_and_index() {
        let json = r#"{"type":"join-tab-group","tabGroupId":"g","tabID":{"name":"A","uuid":"1"},"tabProps":null,"index":null}"#;
        let event: LayoutEvent = serde_json::from_str(json).unwrap();
        let LayoutEvent::JoinTabGroup(join) = event else {
            panic!("expected join");
        };
        assert_eq!(join.tab_props, TabProperties::default());
        assert_eq!(join.index, 0);
    }

    #[test]
    fn test_leave_and_activate_wire_format() {
        let leave: LayoutEvent = serde_json::from_str(
            r#"{"type":"leave-tab-group","tabGroupId":"g","tabID":{"name":"B","uuid":"2"}}"#,
        )
        .unwrap();
        assert!(matches!(leave, LayoutEvent::LeaveTabGroup(_)));
        assert_eq!(leave.tab_id(), &TabIdentifier::new("B", "2"));

        let activated: LayoutEvent = serde_json::from_str(
            r#"{"type":"tab-activated","tabGroupId":"g","tabID":{"name":"B","uuid":"2"}}"#,
        )
        .unwrap();
        assert!(matches!(activated, LayoutEvent::TabActivated(_)));
        assert_eq!(activated.tab_group_id(), "g");
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let result: Result<LayoutEvent, _> = serde_json::from_str(
            r#"{"type":"tab-dragged","tabGroupId":"g","tabID":{"name":"B","uuid":"2"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_group_command_wire_format() {
        let cmd = GroupCommand::MaximizeGroup {
            tab_id: TabIdentifier::new("A", "1"),
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["type"], "maximize-group");
        assert_eq!(value["tabID"]["name"], "A");
        assert_eq!(value["tabID"]["uuid"], "1");
        assert_eq!(cmd.name(), "maximize-group");
    }

    #[test]
    fn test_envelope_serialization() {
        let messages = vec![
            ClientMessage::Hello { window: None },
            ClientMessage::Command(GroupCommand::CloseGroup {
                tab_id: TabIdentifier::new("A", "1"),
            }),
            ClientMessage::Goodbye,
        ];
        for msg in &messages {
            let json = serde_json::to_string(msg).unwrap();
            let restored: ClientMessage = serde_json::from_str(&json).unwrap();
            assert_eq!(&restored, msg);
        }
    }
}
