//! Menu Item Primitive - One activatable entry of a result menu.

use crate::engine::{allocate_index, get_id, pop_parent_context, push_parent_context};
use crate::state::mouse::ClickEvent;
use crate::types::ClassList;
use super::element::{Element, ElementKind};
use super::types::MenuItemProps;

bitflags::bitflags! {
    /// Visual/behavioral capabilities of a menu item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ItemFlags: u8 {
        const ACTIVE = 1 << 0;
        const DISABLED = 1 << 1;
    }
}

impl ItemFlags {
    pub fn from_props(props: &MenuItemProps) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::ACTIVE, props.active);
        flags.set(Self::DISABLED, props.disabled);
        flags
    }

    /// Disabled items swallow clicks.
    pub fn is_clickable(self) -> bool {
        !self.contains(Self::DISABLED)
    }
}

/// Render a menu item.
///
/// The click always prevents default navigation and reaches `on_click`
/// only while the item is enabled.
pub fn menu_item(props: MenuItemProps) -> Element {
    let index = props.index.unwrap_or_else(|| allocate_index(None));
    let flags = ItemFlags::from_props(&props);

    // Link lives under the item so clicks bubble item-ward
    let link_id = format!("{}:link", get_id(index).unwrap_or_else(|| index.to_string()));
    push_parent_context(index);
    let link_index = allocate_index(Some(link_id.as_str()));
    pop_parent_context();

    let on_click = props.on_click;
    let link = Element::new(link_index, ElementKind::Button)
        .role("button")
        .style(props.styles.result_item_link)
        .text(props.content)
        .on_click(move |event: &ClickEvent| {
            event.prevent_default();
            if !flags.is_clickable() {
                return;
            }
            if let Some(on_click) = &on_click {
                on_click(event);
            }
        });

    let classes = ClassList::default()
        .with("active", flags.contains(ItemFlags::ACTIVE))
        .with("disabled", flags.contains(ItemFlags::DISABLED))
        .extend_raw(props.class_name.as_deref());

    Element::new(index, ElementKind::ListItem)
        .classes(classes)
        .style(props.styles.result_item)
        .disabled(props.disabled)
        .child(link)
}
