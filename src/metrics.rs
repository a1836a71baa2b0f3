use opentelemetry::{
    KeyValue,
    global,
    metrics::Counter,
};

/// Instruments recorded by a [`crate::HashRing`].
///
/// Built from the global meter provider, so they are no-ops until
/// [`crate::observability::init_otel_metrics`] installs an exporter.
#[derive(Clone)]
pub struct RingMetrics {
    positions_added: Counter<u64>,
    position_collisions: Counter<u64>,
    lookups: Counter<u64>,
}

impl RingMetrics {
    pub fn new() -> Self {
        let meter = global::meter("hashring");
        Self {
            positions_added: meter
                .u64_counter("hashring_positions_added_total")
                .with_description("Virtual positions inserted into the ring")
                .build(),
            position_collisions: meter
                .u64_counter("hashring_position_collisions_total")
                .with_description("Positions reassigned from one node to a different node")
                .build(),
            lookups: meter
                .u64_counter("hashring_lookups_total")
                .with_description("Key lookups, by whether the ring had any positions")
                .build(),
        }
    }

    pub fn record_positions_added(&self, count: u64) {
        if count > 0 {
            self.positions_added.add(count, &[]);
        }
    }

    pub fn record_collision(&self) {
        self.position_collisions.add(1, &[]);
    }

    pub fn record_lookup(&self, hit: bool) {
        let result = if hit { "hit" } else { "empty" };
        self.lookups.add(1, &[KeyValue::new("result", result)]);
    }
}

impl Default for RingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
