//! Page fixtures and click replay
//!
//! A fixture describes stack panel markup and a click script in JSON. It is
//! replayed against a [`MemoryDom`], recording which items are open after
//! every click.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::config::AppConfig;
use crate::dom::{Dom, MemoryDom};
use crate::error::{StackPanelError, StackPanelResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFixture {
    pub label: String,
    /// Id of the panel the item controls
    pub panel: String,
    /// Authored open state
    #[serde(default)]
    pub open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerFixture {
    pub id: String,
    pub items: Vec<ItemFixture>,
}

/// Click on the link of item `item` of container `container`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickFixture {
    pub container: String,
    pub item: usize,
}

/// Markup plus click script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub config: AppConfig,
    pub containers: Vec<ContainerFixture>,
    #[serde(default)]
    pub clicks: Vec<ClickFixture>,
}

/// Open item labels per container after one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// The click that led here (None for the initial state)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickFixture>,
    /// Whether the click's default action was suppressed
    pub handled: bool,
    pub open: BTreeMap<String, Vec<String>>,
}

impl Fixture {
    pub fn from_json(json: &str) -> StackPanelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the fixture's markup with the configured marker classes
    pub fn build_dom(&self) -> MemoryDom {
        let mut dom = MemoryDom::new();
        for container in &self.containers {
            let items: Vec<(&str, &str, bool)> = container
                .items
                .iter()
                .map(|item| (item.label.as_str(), item.panel.as_str(), item.open))
                .collect();
            dom.stack_panel_with(&container.id, &items, &self.config.markers);
        }
        dom
    }

    /// Initialise the page and replay every click.
    ///
    /// The first snapshot is the state right after initialisation.
    pub fn replay(&self) -> StackPanelResult<Vec<Snapshot>> {
        let mut dom = self.build_dom();
        let app = App::init(&mut dom, &self.config);

        let mut snapshots = vec![Snapshot {
            click: None,
            handled: false,
            open: open_labels(&app, &dom),
        }];

        for click in &self.clicks {
            let container = dom.element_by_id(&click.container).ok_or_else(|| {
                StackPanelError::InvalidFixture(format!("no container '{}'", click.container))
            })?;
            let link = dom
                .item_links(container)
                .get(click.item)
                .copied()
                .ok_or_else(|| {
                    StackPanelError::InvalidFixture(format!(
                        "container '{}' has no item {}",
                        click.container, click.item
                    ))
                })?;

            let dispatch = dom.click(link);
            snapshots.push(Snapshot {
                click: Some(click.clone()),
                handled: dispatch.default_prevented,
                open: open_labels(&app, &dom),
            });
        }

        Ok(snapshots)
    }
}

fn open_labels(app: &App<MemoryDom>, dom: &MemoryDom) -> BTreeMap<String, Vec<String>> {
    app.groups()
        .iter()
        .map(|group| {
            let labels: Vec<String> = group
                .open_items(dom)
                .iter()
                .filter_map(|item| {
                    let anchor = dom.elements_by_tag(item, "a").into_iter().next()?;
                    dom.attribute(&anchor, "title")
                })
                .collect();
            (group.container_id().to_string(), labels)
        })
        .collect()
}
