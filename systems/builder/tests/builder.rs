use tower_defense_core::{
    CellCoord, Command, InputRequest, PlacementError, TowerId, TowerKind, Vector2D,
};
use tower_defense_system_builder::{Builder, PlacementPreview};

#[test]
fn placement_request_emits_place_command() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        InputRequest::PlaceTower {
            x: 95,
            y: 130,
            kind: TowerKind::Sniper,
        },
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            kind: TowerKind::Sniper,
            x: 95,
            y: 130,
        }],
        "builder should forward the raw cursor position to the world",
    );
}

#[test]
fn upgrade_remove_and_pause_requests_are_forwarded() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();
    let tower = TowerId::new(3);

    builder.handle(InputRequest::UpgradeTower { tower }, &mut commands);
    builder.handle(InputRequest::RemoveTower { tower }, &mut commands);
    builder.handle(InputRequest::PauseToggle, &mut commands);

    assert_eq!(
        commands,
        vec![
            Command::UpgradeTower { tower },
            Command::RemoveTower { tower },
            Command::TogglePause,
        ]
    );
}

#[test]
fn wave_requests_are_not_construction() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    builder.handle(InputRequest::StartWave, &mut commands);

    assert!(commands.is_empty(), "wave start is handled by the scheduler");
}

#[test]
fn preview_reports_snapped_centre_and_affordability() {
    let builder = Builder::new();
    let mut looked_up = None;

    let preview = builder.preview(TowerKind::Cannon, 95, 130, 40, 120, |x, y| {
        looked_up = Some((x, y));
        Ok(CellCoord::new(2, 3))
    });

    assert_eq!(looked_up, Some((95, 130)));
    assert_eq!(
        preview,
        PlacementPreview {
            kind: TowerKind::Cannon,
            cell: Some(CellCoord::new(2, 3)),
            center: Vector2D::new(100.0, 140.0),
            placeable: true,
            affordable: false,
            rejection: None,
        }
    );
    assert!(!preview.is_valid(), "cannon costs 150");
}

#[test]
fn preview_carries_cell_rejection() {
    let builder = Builder::new();

    let preview = builder.preview(TowerKind::Basic, 210, 110, 40, 500, |_, _| {
        Err(PlacementError::OnPath)
    });

    assert!(!preview.placeable);
    assert!(preview.affordable);
    assert_eq!(preview.cell, None);
    assert_eq!(preview.rejection, Some(PlacementError::OnPath));
    assert!(!preview.is_valid());
}
