use peeka_core::{ChannelId, GridDirective, GridPhase, GridSlot, GridTimer};

fn confirm(slot: &mut GridSlot) -> Vec<GridDirective> {
    let out = slot.hover_enter();
    let token = out
        .iter()
        .find_map(|d| match d {
            GridDirective::Schedule {
                timer: GridTimer::Show,
                token,
                ..
            } => Some(*token),
            _ => None,
        })
        .expect("hover must arm a show timer");
    slot.timer_fired(GridTimer::Show, token)
}

#[test]
fn three_cards_hold_independent_surfaces() {
    let mut slots: Vec<GridSlot> = ["alpha", "beta", "gamma"]
        .iter()
        .map(|name| GridSlot::new(ChannelId::new(name).unwrap()))
        .collect();

    for slot in &mut slots {
        let out = confirm(slot);
        let mounted = out
            .iter()
            .filter(|d| matches!(d, GridDirective::Mount { .. }))
            .count();
        assert_eq!(mounted, 1);
        assert_eq!(slot.phase(), GridPhase::Active);
    }

    // Restoring one card leaves the others untouched.
    let out = slots[1].restore();
    assert!(out.contains(&GridDirective::Restore));
    assert_eq!(slots[0].phase(), GridPhase::Active);
    assert_eq!(slots[1].phase(), GridPhase::Idle);
    assert_eq!(slots[2].phase(), GridPhase::Active);
}

#[test]
fn load_completion_cross_fades_only_while_active() {
    let mut slot = GridSlot::new(ChannelId::new("alpha").unwrap());
    assert!(slot.surface_loaded().is_empty());
    let _ = confirm(&mut slot);
    assert_eq!(slot.surface_loaded(), vec![GridDirective::CrossFade]);
    let _ = slot.restore();
    // A straggling load event after restore has nothing to fade.
    assert!(slot.surface_loaded().is_empty());
}

#[test]
fn record_directive_carries_the_card_channel() {
    let mut slot = GridSlot::new(ChannelId::new("alpha").unwrap());
    let out = confirm(&mut slot);
    let record = out.iter().find_map(|d| match d {
        GridDirective::ScheduleRecord { channel, .. } => Some(channel.clone()),
        _ => None,
    });
    assert_eq!(record.unwrap().as_str(), "alpha");
}
