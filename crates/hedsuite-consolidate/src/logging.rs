// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationStage {
    Prepare,
    Decode,
    Index,
    Persist,
    Finalize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsolidationEvent {
    pub stage: ConsolidationStage,
    pub name: String,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConsolidationLog {
    events: Vec<ConsolidationEvent>,
}

impl ConsolidationLog {
    pub fn emit<I, K, V>(&mut self, stage: ConsolidationStage, name: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.events.push(ConsolidationEvent {
            stage,
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        });
    }

    #[must_use]
    pub fn into_events(self) -> Vec<ConsolidationEvent> {
        self.events
    }
}
