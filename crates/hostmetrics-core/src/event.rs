//! Reading events: the unit of output of a collection pass.
//!
//! A [`ReadingEvent`] bundles every property read from one source during one
//! pass. It is stamped exactly once, at construction, after the property list
//! is complete. Parsing therefore finishes before the clock is read and the
//! recorded time trails the true sample time slightly; this skew is accepted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::metric::Property;

/// Malformed constructor input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid argument: {message}")]
pub struct InvalidArgumentError {
    pub message: String,
}

impl InvalidArgumentError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Opaque identity of where a reading originates (a host, a device, a process).
///
/// Never empty. Compared by value and used only as a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceAddress(String);

impl SourceAddress {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, InvalidArgumentError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(InvalidArgumentError::new("source address must not be empty"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceAddress {
    type Error = InvalidArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SourceAddress> for String {
    fn from(address: SourceAddress) -> Self {
        address.0
    }
}

impl PartialEq<str> for SourceAddress {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SourceAddress {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable, timestamped bundle of properties from one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingEvent {
    source_address: SourceAddress,
    timestamp: DateTime<Utc>,
    properties: Vec<Property>,
}

impl ReadingEvent {
    /// Creates an event stamped with the wall clock.
    pub fn new(source_address: SourceAddress, properties: Vec<Property>) -> Self {
        Self::with_clock(source_address, properties, &SystemClock)
    }

    /// Creates an event stamped with `clock`. This is the only place a clock is read.
    pub fn with_clock(
        source_address: SourceAddress,
        properties: Vec<Property>,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            source_address,
            timestamp: clock.now(),
            properties,
        }
    }

    /// Creates an event from an unvalidated address.
    ///
    /// Fails before looking at `properties` when the address is empty.
    pub fn try_new(
        source_address: impl AsRef<str>,
        properties: Vec<Property>,
    ) -> Result<Self, InvalidArgumentError> {
        let source_address = SourceAddress::parse(source_address)?;
        Ok(Self::new(source_address, properties))
    }

    pub fn source_address(&self) -> &SourceAddress {
        &self.source_address
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Properties in the order they were collected.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// First property with the given name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }
}
