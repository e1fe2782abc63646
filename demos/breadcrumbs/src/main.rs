use crumbtrail::prelude::*;

/// Draw the visible partition as a single line.
fn render(manager: &BreadcrumbManager) -> String {
    let config = manager.config();
    let separator = format!(" {} ", config.separator.as_str());
    let visible = manager.visible_items();

    let mut parts: Vec<String> = visible.before_items.iter().map(|item| item.label.clone()).collect();
    if visible.needs_collapse {
        parts.push(format!("… ({} hidden)", visible.collapsed_items.len()));
    }
    parts.extend(visible.after_items.iter().map(|item| item.label.clone()));
    parts.join(&separator)
}

fn section(title: &str, manager: &BreadcrumbManager) {
    println!("{title}");
    println!("  {}  [v{}]", render(manager), manager.version());
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Breadcrumbs Demo\n");

    // File system navigation with dropdown siblings
    let mut files = BreadcrumbManager::new(
        vec![
            BreadcrumbItem::new("Home").with_key("user").with_path("/home/user").with_children(vec![
                DropdownItem::new("Documents").with_path("/home/user/Documents"),
                DropdownItem::new("Downloads").with_path("/home/user/Downloads"),
                DropdownItem::new("Pictures").with_path("/home/user/Pictures"),
            ]),
            BreadcrumbItem::new("Documents").with_key("documents").with_path("/home/user/Documents"),
            BreadcrumbItem::new("Projects").with_key("projects").with_path("/home/user/Documents/Projects"),
            BreadcrumbItem::new("MyApp").with_key("myapp"),
        ],
        BreadcrumbConfig {
            separator: Separator::Arrow,
            enable_history: true,
            ..Default::default()
        },
    )?;
    files.on_click(|event| {
        println!("  Clicked breadcrumb: {} ({:?})", event.item.label, event.item.link());
        Ok(())
    });
    files.on_dropdown_select(|event| {
        println!(
            "  Switching from {} to {}",
            event.parent_item.label, event.selected_item.label
        );
        Ok(())
    });
    section("File System Navigation:", &files);

    let items = files.items();
    for (index, item) in items.iter().enumerate() {
        if files.is_clickable(index) {
            files.handle_click(item, index, None);
        }
    }
    if let Some(sibling) = items[0].children.get(1) {
        files.handle_dropdown_select(&items[0], sibling, None);
    }

    files.navigate_to("documents")?;
    section("After navigating to Documents:", &files);
    files.undo()?;
    section("After undo:", &files);

    // Web navigation with an injected home item
    let web = BreadcrumbManager::new(
        vec![
            BreadcrumbItem::new("Documentation").with_path("/docs"),
            BreadcrumbItem::new("API Reference").with_path("/docs/api"),
            BreadcrumbItem::new("Widgets").with_path("/docs/api/widgets"),
            BreadcrumbItem::new("Breadcrumbs").with_clickable(false),
        ],
        BreadcrumbConfig {
            separator: Separator::Slash,
            show_home: true,
            ..Default::default()
        },
    )?;
    section("\nWeb Navigation:", &web);

    // Collapsed navigation
    let mut collapsed = BreadcrumbManager::new(
        ["Root", "Very", "Long", "Path", "Structure", "Here"]
            .iter()
            .map(|label| BreadcrumbItem::new(*label))
            .collect(),
        BreadcrumbConfig::from_toml(
            r#"
            separator = "chevron"
            max_items = 3
            items_before_collapse = 1
            items_after_collapse = 2
            "#,
        )?,
    )?;
    collapsed.on_expand_change(|event| {
        println!("  Expanded: {}", event.expanded);
        Ok(())
    });
    section("\nCollapsed Navigation (max 3 items):", &collapsed);
    collapsed.toggle_expand()?;
    section("Expanded:", &collapsed);

    collapsed.batch(|batch| {
        batch.remove_item("breadcrumb-1");
        batch.update_item("breadcrumb-5", BreadcrumbItemPatch::new().label("There"));
        batch.add_item(BreadcrumbItem::new("Leaf"), None);
        Ok(())
    })?;
    section("After batch:", &collapsed);

    smol::block_on(async {
        collapsed.on_async(BreadcrumbEventKind::Click, |event| async move {
            if let BreadcrumbEvent::Click(click) = event {
                log::info!("Async navigation to {}", click.item.label);
            }
            Ok(())
        });
        let last = collapsed.items().pop();
        if let Some(last) = last {
            collapsed.handle_click_async(&last, collapsed.count() - 1, None).await;
        }
    });

    collapsed.destroy();
    if let Err(err) = collapsed.clear() {
        println!("\n{err}");
    }

    Ok(())
}
