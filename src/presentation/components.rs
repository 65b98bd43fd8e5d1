//! The capability table of presentation components.
//!
//! Each slot holds one component behind the interface for its kind (plain
//! component, container with children, or text input) plus the caller's
//! static custom props. Caller overrides are merged over the defaults once,
//! when the table is built.

use std::rc::Rc;

use serde_json::{Map, Value};

use super::props::{
    ChipClearProps, ChipProps, ComponentProps, ExpandToggleProps, FieldClearProps, FieldProps,
    FooterProps, InputProps, PlaceholderProps, RowProps, SelectAllProps,
};

/// A response that can report activation of the element it belongs to.
pub trait Activated {
    fn activated(&self) -> bool;
}

impl Activated for bool {
    fn activated(&self) -> bool {
        *self
    }
}

/// A rendering backend.
pub trait RenderContext {
    type Response: Activated;

    /// Lays out whatever `add` renders on one line.
    fn group_horizontal(&mut self, add: &mut dyn FnMut(&mut Self));

    /// Leading space of `levels` indentation steps.
    fn indent(&mut self, _levels: usize) {}
}

/// A leaf component.
pub trait Component<C: RenderContext, P> {
    fn render(&self, ctx: &mut C, props: &ComponentProps<'_, P>) -> C::Response;
}

impl<C, P, F> Component<C, P> for F
where
    C: RenderContext,
    F: Fn(&mut C, &ComponentProps<'_, P>) -> C::Response,
{
    fn render(&self, ctx: &mut C, props: &ComponentProps<'_, P>) -> C::Response {
        self(ctx, props)
    }
}

/// A component that wraps children it does not know about.
pub trait Container<C: RenderContext, P> {
    fn render(
        &self,
        ctx: &mut C,
        props: &ComponentProps<'_, P>,
        children: &mut dyn FnMut(&mut C),
    ) -> C::Response;
}

impl<C, P, F> Container<C, P> for F
where
    C: RenderContext,
    F: Fn(&mut C, &ComponentProps<'_, P>, &mut dyn FnMut(&mut C)) -> C::Response,
{
    fn render(
        &self,
        ctx: &mut C,
        props: &ComponentProps<'_, P>,
        children: &mut dyn FnMut(&mut C),
    ) -> C::Response {
        self(ctx, props, children)
    }
}

/// What a text input reports back.
pub struct TextOutcome<R> {
    pub response: R,
    /// New text if the user edited it this pass.
    pub edited: Option<String>,
}

/// The search input.
pub trait TextInput<C: RenderContext> {
    fn render(&self, ctx: &mut C, props: &ComponentProps<'_, InputProps>) -> TextOutcome<C::Response>;
}

impl<C, F> TextInput<C> for F
where
    C: RenderContext,
    F: Fn(&mut C, &ComponentProps<'_, InputProps>) -> TextOutcome<C::Response>,
{
    fn render(&self, ctx: &mut C, props: &ComponentProps<'_, InputProps>) -> TextOutcome<C::Response> {
        self(ctx, props)
    }
}

/// One slot: an implementation plus its custom props.
pub struct Slot<T: ?Sized> {
    pub component: Rc<T>,
    pub custom: Value,
}

impl<T: ?Sized> Slot<T> {
    pub fn with_custom(mut self, custom: Value) -> Self {
        self.custom = custom;
        self
    }
}

impl<T: ?Sized> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            component: Rc::clone(&self.component),
            custom: self.custom.clone(),
        }
    }
}

fn empty_custom() -> Value {
    Value::Object(Map::new())
}

pub type ComponentSlot<C, P> = Slot<dyn Component<C, P>>;
pub type ContainerSlot<C, P> = Slot<dyn Container<C, P>>;
pub type InputSlot<C> = Slot<dyn TextInput<C>>;

/// Builds a leaf slot from a function.
pub fn component<C, P, F>(f: F) -> ComponentSlot<C, P>
where
    C: RenderContext + 'static,
    P: 'static,
    F: Fn(&mut C, &ComponentProps<'_, P>) -> C::Response + 'static,
{
    Slot {
        component: Rc::new(f),
        custom: empty_custom(),
    }
}

/// Builds a container slot from a function.
pub fn container<C, P, F>(f: F) -> ContainerSlot<C, P>
where
    C: RenderContext + 'static,
    P: 'static,
    F: Fn(&mut C, &ComponentProps<'_, P>, &mut dyn FnMut(&mut C)) -> C::Response + 'static,
{
    Slot {
        component: Rc::new(f),
        custom: empty_custom(),
    }
}

/// Builds an input slot from a function.
pub fn text_input<C, F>(f: F) -> InputSlot<C>
where
    C: RenderContext + 'static,
    F: Fn(&mut C, &ComponentProps<'_, InputProps>) -> TextOutcome<C::Response> + 'static,
{
    Slot {
        component: Rc::new(f),
        custom: empty_custom(),
    }
}

/// The complete table used by the render driver.
pub struct Components<C: RenderContext> {
    pub field: ContainerSlot<C, FieldProps>,
    pub chip: ComponentSlot<C, ChipProps>,
    pub chip_clear: ComponentSlot<C, ChipClearProps>,
    pub field_clear: ComponentSlot<C, FieldClearProps>,
    pub input: InputSlot<C>,
    pub select_all: ComponentSlot<C, SelectAllProps>,
    pub row: ComponentSlot<C, RowProps>,
    pub expand_toggle: ComponentSlot<C, ExpandToggleProps>,
    pub footer: ComponentSlot<C, FooterProps>,
    pub placeholder: ComponentSlot<C, PlaceholderProps>,
}

impl<C: RenderContext> Clone for Components<C> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            chip: self.chip.clone(),
            chip_clear: self.chip_clear.clone(),
            field_clear: self.field_clear.clone(),
            input: self.input.clone(),
            select_all: self.select_all.clone(),
            row: self.row.clone(),
            expand_toggle: self.expand_toggle.clone(),
            footer: self.footer.clone(),
            placeholder: self.placeholder.clone(),
        }
    }
}

/// Caller-supplied replacements; unset slots keep the default.
pub struct ComponentOverrides<C: RenderContext> {
    pub field: Option<ContainerSlot<C, FieldProps>>,
    pub chip: Option<ComponentSlot<C, ChipProps>>,
    pub chip_clear: Option<ComponentSlot<C, ChipClearProps>>,
    pub field_clear: Option<ComponentSlot<C, FieldClearProps>>,
    pub input: Option<InputSlot<C>>,
    pub select_all: Option<ComponentSlot<C, SelectAllProps>>,
    pub row: Option<ComponentSlot<C, RowProps>>,
    pub expand_toggle: Option<ComponentSlot<C, ExpandToggleProps>>,
    pub footer: Option<ComponentSlot<C, FooterProps>>,
    pub placeholder: Option<ComponentSlot<C, PlaceholderProps>>,
}

impl<C: RenderContext> Default for ComponentOverrides<C> {
    fn default() -> Self {
        Self {
            field: None,
            chip: None,
            chip_clear: None,
            field_clear: None,
            input: None,
            select_all: None,
            row: None,
            expand_toggle: None,
            footer: None,
            placeholder: None,
        }
    }
}

impl<C: RenderContext> Components<C> {
    /// Merges `overrides` over `defaults`.
    pub fn with_overrides(defaults: Self, overrides: ComponentOverrides<C>) -> Self {
        Self {
            field: overrides.field.unwrap_or(defaults.field),
            chip: overrides.chip.unwrap_or(defaults.chip),
            chip_clear: overrides.chip_clear.unwrap_or(defaults.chip_clear),
            field_clear: overrides.field_clear.unwrap_or(defaults.field_clear),
            input: overrides.input.unwrap_or(defaults.input),
            select_all: overrides.select_all.unwrap_or(defaults.select_all),
            row: overrides.row.unwrap_or(defaults.row),
            expand_toggle: overrides.expand_toggle.unwrap_or(defaults.expand_toggle),
            footer: overrides.footer.unwrap_or(defaults.footer),
            placeholder: overrides.placeholder.unwrap_or(defaults.placeholder),
        }
    }
}
