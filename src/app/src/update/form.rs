use crux_core::{render::render, Command};
use serde_valid::Validate;

use crate::events::{Event, FormEvent};
use crate::model::Model;
use crate::types::{FormLayout, FormState};
use crate::Effect;

/// Handle form editing events
pub fn handle(event: FormEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        FormEvent::Register { layout } => register(layout, model),

        FormEvent::SetValue { name, index, value } => {
            if model.form.set_value(&name, index, value) {
                render()
            } else {
                log::warn!("no input {name}[{index}] to set");
                Command::done()
            }
        }

        FormEvent::SetChecked {
            name,
            value,
            checked,
        } => {
            if model.form.set_checked(&name, &value, checked) {
                render()
            } else {
                log::warn!("no checkable input {name}={value}");
                Command::done()
            }
        }

        FormEvent::Reset => {
            model.form.reset();
            render()
        }
    }
}

/// Replace the built-in layout with the one the shell renders
fn register(layout: FormLayout, model: &mut Model) -> Command<Effect, Event> {
    if let Err(e) = layout.validate() {
        return model.set_error_and_render(format!("Invalid form layout: {e}"));
    }

    let mut form = FormState::from_layout(layout);
    if let Some(config) = &model.config {
        form.populate(config);
    }
    log::debug!("registered form with {} inputs", form.fields.len());
    model.form = form;
    render()
}
