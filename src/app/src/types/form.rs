//! Configuration form model.
//!
//! The form is held in the core in field order, the same order the browser
//! keeps its inputs in. Serializing it yields the `/config` payload; populating
//! it from a `/config` response follows the browser's input semantics.

use serde::{Deserialize, Serialize};
use serde_valid::Validate;

use crate::types::{ConfigValue, Configuration, FieldError};

/// Radio group selecting DHCP (`"0"`) or a static address (`"1"`).
pub const STATIC_IP_FIELD: &str = "w_sta_static";
/// Station SSID, target of a WiFi scan selection.
pub const STA_SSID_FIELD: &str = "w_sta_ssid";

/// Value sent for a checkbox that is not checked.
pub const UNCHECKED_VALUE: &str = "0";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Password,
    Number,
    Select,
    Checkbox,
    Radio,
    /// Carries a configured value the visible form has no input for.
    Hidden,
}

impl FieldKind {
    fn is_checkable(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

/// One form input.
///
/// For checkboxes and radios `value` is the declared value sent when checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    #[validate(min_length = 1)]
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl FormField {
    fn new(name: &str, kind: FieldKind, value: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value: value.to_string(),
            checked: false,
            required: false,
            min: None,
            max: None,
            max_length: None,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::Text, "")
    }

    pub fn password(name: &str) -> Self {
        Self::new(name, FieldKind::Password, "")
    }

    pub fn number(name: &str, min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::new(name, FieldKind::Number, "")
        }
    }

    pub fn select(name: &str, value: &str) -> Self {
        Self::new(name, FieldKind::Select, value)
    }

    pub fn checkbox(name: &str, value: &str) -> Self {
        Self::new(name, FieldKind::Checkbox, value)
    }

    pub fn radio(name: &str, value: &str) -> Self {
        Self::new(name, FieldKind::Radio, value)
    }

    pub fn hidden(name: &str, value: &str) -> Self {
        Self::new(name, FieldKind::Hidden, value)
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn constraint_violation(&self) -> Option<String> {
        if self.kind.is_checkable() {
            return (self.kind == FieldKind::Checkbox && self.required && !self.checked)
                .then(|| "must be checked".to_string());
        }

        if self.value.is_empty() {
            return self.required.then(|| "is required".to_string());
        }

        if let Some(max_length) = self.max_length {
            if self.value.chars().count() > max_length {
                return Some(format!("is longer than {max_length} characters"));
            }
        }

        if self.kind == FieldKind::Number {
            let Ok(number) = self.value.trim().parse::<i64>() else {
                return Some("is not a number".to_string());
            };
            if let Some(min) = self.min.filter(|min| number < *min) {
                return Some(format!("must be at least {min}"));
            }
            if let Some(max) = self.max.filter(|max| number > *max) {
                return Some(format!("must be at most {max}"));
            }
        }

        None
    }
}

/// A form section whose inputs are enabled by a companion checkbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[validate(min_length = 1)]
    pub id: String,
    /// Name of the checkbox enabling this section.
    #[validate(min_length = 1)]
    pub toggle: String,
}

impl Section {
    pub fn new(id: &str, toggle: &str) -> Self {
        Self {
            id: id.to_string(),
            toggle: toggle.to_string(),
        }
    }
}

/// Form description registered by the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FormLayout {
    #[validate(min_items = 1)]
    #[validate]
    pub fields: Vec<FormField>,
    #[serde(default)]
    #[validate]
    pub sections: Vec<Section>,
}

impl FormLayout {
    /// The configuration form served by the NTRIP Duo firmware.
    pub fn device() -> Self {
        let mut fields = vec![
            FormField::checkbox("w_sta_active", "1").checked(true),
            FormField::text(STA_SSID_FIELD).max_length(32),
            FormField::password("w_sta_pass").max_length(64),
            FormField::radio(STATIC_IP_FIELD, "0").checked(true),
            FormField::radio(STATIC_IP_FIELD, "1"),
        ];
        for name in ["w_sta_ip", "w_sta_gateway", "w_sta_subnet"] {
            fields.extend((0..4).map(|_| FormField::number(name, 0, 255)));
        }
        fields.extend([
            FormField::checkbox("w_ap_active", "1").checked(true),
            FormField::text("w_ap_ssid").max_length(32),
            FormField::password("w_ap_pass").max_length(64),
        ]);
        for prefix in ["ntr_srv", "ntr_srv_2", "ntr_cli"] {
            fields.extend(ntrip_fields(prefix));
        }
        fields.push(FormField::text("ntr_cli_user").max_length(64));
        fields.extend([
            FormField::select("uart_baud", "115200"),
            FormField::number("uart_data_bits", 5, 8).with_value("8"),
            FormField::number("uart_stop_bits", 1, 2).with_value("1"),
            FormField::select("uart_parity", "0"),
        ]);

        Self {
            fields,
            sections: vec![
                Section::new("wifi-sta", "w_sta_active"),
                Section::new("wifi-ap", "w_ap_active"),
                Section::new("ntrip-srv", "ntr_srv_active"),
                Section::new("ntrip-srv2", "ntr_srv_2_active"),
                Section::new("ntrip-cli", "ntr_cli_active"),
            ],
        }
    }
}

fn ntrip_fields(prefix: &str) -> [FormField; 5] {
    [
        FormField::checkbox(&format!("{prefix}_active"), "1"),
        FormField::text(&format!("{prefix}_host")).max_length(128),
        FormField::number(&format!("{prefix}_port"), 1, 65535).with_value("2101"),
        FormField::text(&format!("{prefix}_mp")).max_length(64),
        FormField::password(&format!("{prefix}_pass")).max_length(64),
    ]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionState {
    pub id: String,
    pub enabled: bool,
}

/// Derived enable/visibility state, recomputed after every form change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormUiState {
    pub sections: Vec<SectionState>,
    pub static_ip_visible: bool,
}

/// Live form state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub fields: Vec<FormField>,
    pub sections: Vec<Section>,
    /// Validation errors of the last submit attempt
    pub errors: Vec<FieldError>,
    /// Set once a submit attempt failed validation (form is shown as invalid)
    pub was_validated: bool,
    pub ui: FormUiState,
    defaults: Vec<FormField>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::from_layout(FormLayout::device())
    }
}

impl FormState {
    pub fn from_layout(layout: FormLayout) -> Self {
        let mut form = Self {
            defaults: layout.fields.clone(),
            fields: layout.fields,
            sections: layout.sections,
            errors: Vec::new(),
            was_validated: false,
            ui: FormUiState::default(),
        };
        form.refresh_ui();
        form
    }

    /// Fill the form from a device configuration.
    ///
    /// Configured names without an input are kept as hidden fields so the next
    /// submission still carries them.
    pub fn populate(&mut self, config: &Configuration) {
        for (name, value) in config.fields() {
            if !self.fields.iter().any(|f| &f.name == name) {
                self.adopt(name, value);
                continue;
            }

            for (index, field) in self.fields.iter_mut().filter(|f| &f.name == name).enumerate() {
                if field.kind.is_checkable() {
                    field.checked = value.selects(&field.value);
                } else {
                    field.value = value.at(index);
                }
            }
        }
        self.refresh_ui();
    }

    fn adopt(&mut self, name: &str, value: &ConfigValue) {
        match value {
            ConfigValue::Single(v) => self.fields.push(FormField::hidden(name, v)),
            ConfigValue::Multiple(values) => self
                .fields
                .extend(values.iter().map(|v| FormField::hidden(name, v))),
        }
    }

    /// Serialize into the `/config` payload.
    ///
    /// Repeated names collapse into an ordered list. Unchecked checkboxes are
    /// sent as `"0"` unless another input already provides their name.
    pub fn serialize(&self) -> Configuration {
        let mut payload = Configuration::new();

        for field in &self.fields {
            if field.kind.is_checkable() && !field.checked {
                continue;
            }
            match payload.get_mut(&field.name) {
                Some(existing) => existing.push(field.value.clone()),
                None => payload.insert(field.name.clone(), field.value.as_str()),
            }
        }

        for field in &self.fields {
            if field.kind == FieldKind::Checkbox && !payload.contains(&field.name) {
                payload.insert(field.name.clone(), UNCHECKED_VALUE);
            }
        }

        payload
    }

    /// Check every field's constraints, in form order.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut seen = std::collections::HashMap::<&str, usize>::new();

        for field in &self.fields {
            let index = seen.entry(field.name.as_str()).or_default();
            if let Some(reason) = field.constraint_violation() {
                errors.push(FieldError {
                    name: field.name.clone(),
                    index: *index,
                    reason,
                });
            }
            *index += 1;
        }

        for field in &self.fields {
            if field.kind == FieldKind::Radio
                && field.required
                && !self.fields.iter().any(|f| f.name == field.name && f.checked)
                && !errors.iter().any(|e| e.name == field.name)
            {
                errors.push(FieldError {
                    name: field.name.clone(),
                    index: 0,
                    reason: "requires a selection".to_string(),
                });
            }
        }

        errors
    }

    /// Set the value of the `index`-th input named `name`.
    pub fn set_value(&mut self, name: &str, index: usize, value: String) -> bool {
        let target = self
            .fields
            .iter_mut()
            .filter(|f| f.name == name && !f.kind.is_checkable())
            .nth(index);

        let Some(field) = target else {
            return false;
        };
        field.value = value;
        self.refresh_ui();
        true
    }

    /// Check or uncheck the checkbox/radio `name` with declared `value`.
    ///
    /// Checking a radio unchecks the rest of its group.
    pub fn set_checked(&mut self, name: &str, value: &str, checked: bool) -> bool {
        let Some(position) = self
            .fields
            .iter()
            .position(|f| f.name == name && f.value == value && f.kind.is_checkable())
        else {
            return false;
        };

        if self.fields[position].kind == FieldKind::Radio && checked {
            for field in self
                .fields
                .iter_mut()
                .filter(|f| f.name == name && f.kind == FieldKind::Radio)
            {
                field.checked = false;
            }
        }
        self.fields[position].checked = checked;
        self.refresh_ui();
        true
    }

    /// Restore every input to its layout default.
    pub fn reset(&mut self) {
        self.fields = self.defaults.clone();
        self.errors.clear();
        self.was_validated = false;
        self.refresh_ui();
    }

    /// First value of a text-like input.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name && !f.kind.is_checkable())
            .map(|f| f.value.as_str())
    }

    pub fn is_checked(&self, name: &str, value: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.name == name && f.value == value && f.kind.is_checkable() && f.checked)
    }

    /// Recompute section enablement and static IP visibility. Idempotent.
    pub fn refresh_ui(&mut self) {
        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                self.fields
                    .iter()
                    .find(|f| f.kind == FieldKind::Checkbox && f.name == section.toggle)
                    .map(|toggle| SectionState {
                        id: section.id.clone(),
                        enabled: toggle.checked,
                    })
            })
            .collect();

        self.ui = FormUiState {
            sections,
            static_ip_visible: self.is_checked(STATIC_IP_FIELD, "1"),
        };
    }
}
