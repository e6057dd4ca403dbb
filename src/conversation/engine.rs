//! Conversation engine: event handling over per-user sessions

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chart::ChartCalculator;
use crate::domain::{BirthInput, ChartPoint, NatalChart};
use crate::geo::GeoResolver;
use crate::session::{SessionState, SessionStore, StateTag, UserId};
use crate::validation::{validate_date, validate_time};

use super::views;
use super::{Event, Reply};

/// Sequences collection, chart computation, and the read-only chart view
///
/// `handle` is infallible from the caller's perspective: every validation or
/// collaborator failure is mapped to a fixed retry message and the session
/// state is left exactly as it was. The engine owns the session store; one
/// engine processes one event at a time (see [`super::ConversationHandle`]).
pub struct ConversationEngine {
    sessions: SessionStore,
    geo: Arc<GeoResolver>,
    calculator: Arc<ChartCalculator>,
    cutoff_year: i32,
}

impl ConversationEngine {
    pub fn new(sessions: SessionStore, geo: Arc<GeoResolver>, calculator: Arc<ChartCalculator>, cutoff_year: i32) -> Self {
        Self {
            sessions,
            geo,
            calculator,
            cutoff_year,
        }
    }

    /// Process one inbound event for one user
    pub async fn handle(&mut self, user: &UserId, event: Event) -> Reply {
        debug!(user = %user, ?event, "handle: event received");

        match event {
            Event::Greet => Reply::text(views::greeting()),
            Event::Begin => {
                let tag = self.sessions.session_mut(user).state.tag();
                self.prompt_reply(tag)
            }
            Event::Reset => self.reset(user),
            Event::Text(text) => self.handle_text(user, text.trim()).await,
            Event::Select(label) => self.handle_selection(user, label.trim()),
        }
    }

    /// Current state tag for a user, if a session exists
    pub fn state_tag(&self, user: &UserId) -> Option<StateTag> {
        self.sessions.session(user).map(|s| s.state.tag())
    }

    /// The stored chart, once a user's session is in `ChartReady`
    pub fn chart(&self, user: &UserId) -> Option<&NatalChart> {
        match self.sessions.session(user).map(|s| &s.state) {
            Some(SessionState::ChartReady { chart, .. }) => Some(chart),
            _ => None,
        }
    }

    fn reset(&mut self, user: &UserId) -> Reply {
        info!(user = %user, "reset: starting a new chart");
        self.sessions.reset(user);
        Reply::text(views::date_prompt())
    }

    fn prompt_reply(&self, tag: StateTag) -> Reply {
        match tag {
            StateTag::ChartReady => Reply::with_options(views::chart_ready(), views::selection_labels()),
            other => Reply::text(views::prompt_for(other)),
        }
    }

    async fn handle_text(&mut self, user: &UserId, text: &str) -> Reply {
        let state = self.sessions.session_mut(user).state.clone();

        match state {
            SessionState::AwaitingDate => match validate_date(text, self.cutoff_year) {
                Ok(date) => {
                    self.sessions.session_mut(user).state = SessionState::AwaitingTime { date };
                    Reply::text(views::time_prompt())
                }
                Err(e) => {
                    debug!(user = %user, error = %e, "handle_text: date rejected");
                    Reply::text(views::validation_message(&e))
                }
            },

            SessionState::AwaitingTime { date } => match validate_time(text) {
                Ok(time) => {
                    self.sessions.session_mut(user).state = SessionState::AwaitingPlace { date, time };
                    Reply::text(views::place_prompt())
                }
                Err(e) => {
                    debug!(user = %user, error = %e, "handle_text: time rejected");
                    Reply::text(views::validation_message(&e))
                }
            },

            SessionState::AwaitingPlace { date, time } => {
                let coords = match self.geo.resolve_coordinates(text).await {
                    Ok(coords) => coords,
                    Err(e) => {
                        warn!(user = %user, error = %e, "handle_text: place unresolved");
                        return Reply::text(views::resolution_message(&e.into()));
                    }
                };

                // Atomic: the session only advances with a complete chart
                match self.calculator.compute(date, time, coords) {
                    Ok(chart) => {
                        info!(user = %user, "handle_text: chart computed");
                        self.sessions.session_mut(user).state = SessionState::ChartReady {
                            input: BirthInput {
                                date,
                                time,
                                place: text.to_string(),
                            },
                            chart,
                        };
                        Reply::with_options(views::chart_ready(), views::selection_labels())
                    }
                    Err(e) => {
                        warn!(user = %user, error = %e, "handle_text: chart computation failed");
                        Reply::text(views::resolution_message(&e))
                    }
                }
            }

            // Plain text while the chart is ready is treated as a selection
            SessionState::ChartReady { .. } => self.handle_selection(user, text),
        }
    }

    fn handle_selection(&mut self, user: &UserId, label: &str) -> Reply {
        if label.eq_ignore_ascii_case(views::NEW_CHART_LABEL) {
            return self.reset(user);
        }

        match &self.sessions.session_mut(user).state {
            SessionState::ChartReady { chart, .. } => {
                let found = ChartPoint::from_label(label).and_then(|point| chart.point(point).map(|data| (point, data)));
                match found {
                    Some((point, (degree, sign, description))) => Reply::with_options(
                        views::position_text(point, degree, sign, description),
                        views::selection_labels(),
                    ),
                    None => {
                        debug!(user = %user, label = %label, "handle_selection: unknown label");
                        Reply::with_options(views::unknown_selection(), views::selection_labels())
                    }
                }
            }
            // Selections are only meaningful once the chart exists
            other => {
                let tag = other.tag();
                self.prompt_reply(tag)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartError;
    use crate::descriptions::{DescriptionError, DescriptionSource};
    use crate::domain::{CelestialBody, Coordinates, ZodiacSign};
    use crate::ephemeris::{Ephemeris, EphemerisError, HouseSystem, Houses, ObserverPosition};
    use crate::geo::{GeoError, Geocoder, TimezoneLookup};
    use async_trait::async_trait;

    struct MapGeocoder;

    #[async_trait]
    impl Geocoder for MapGeocoder {
        async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, GeoError> {
            match place {
                "Moscow" => Ok(Some(Coordinates::new(55.75, 37.61).unwrap())),
                _ => Ok(None),
            }
        }
    }

    struct FixedTimezone;

    impl TimezoneLookup for FixedTimezone {
        fn timezone_for(&self, _coords: Coordinates) -> Option<String> {
            Some("Europe/Moscow".to_string())
        }
    }

    struct LinearEphemeris;

    impl Ephemeris for LinearEphemeris {
        fn set_observer(&mut self, _observer: ObserverPosition) {}

        fn body_position(&mut self, _jd: f64, body: CelestialBody) -> Result<f64, EphemerisError> {
            Ok(body.index() as f64 * 36.0)
        }

        fn house_cusps(
            &mut self,
            _jd: f64,
            _coords: Coordinates,
            _system: HouseSystem,
        ) -> Result<Houses, EphemerisError> {
            Ok(Houses {
                ascendant: 200.0,
                midheaven: 110.0,
            })
        }
    }

    struct NoDescriptions;

    impl DescriptionSource for NoDescriptions {
        fn lookup(&self, _point: ChartPoint, _sign: ZodiacSign) -> Result<Option<String>, DescriptionError> {
            Ok(None)
        }
    }

    fn engine() -> ConversationEngine {
        let geo = Arc::new(GeoResolver::new(Arc::new(MapGeocoder), Arc::new(FixedTimezone)));
        let calculator = Arc::new(ChartCalculator::new(
            Box::new(LinearEphemeris),
            Arc::new(NoDescriptions),
            Arc::clone(&geo),
            0.0,
        ));
        ConversationEngine::new(SessionStore::new(), geo, calculator, 2024)
    }

    async fn drive_to_chart(engine: &mut ConversationEngine, user: &UserId) {
        engine.handle(user, Event::Text("15.06.1990".into())).await;
        engine.handle(user, Event::Text("08:45".into())).await;
        engine.handle(user, Event::Text("Moscow".into())).await;
    }

    #[tokio::test]
    async fn test_happy_path_reaches_chart_ready() {
        let mut engine = engine();
        let user = UserId::from("u1");

        let reply = engine.handle(&user, Event::Text("15.06.1990".into())).await;
        assert_eq!(reply.text, views::time_prompt());
        assert_eq!(engine.state_tag(&user), Some(StateTag::AwaitingTime));

        let reply = engine.handle(&user, Event::Text("08:45".into())).await;
        assert_eq!(reply.text, views::place_prompt());

        let reply = engine.handle(&user, Event::Text("Moscow".into())).await;
        assert_eq!(reply.text, views::chart_ready());
        assert_eq!(reply.options.len(), 12);
        assert_eq!(engine.state_tag(&user), Some(StateTag::ChartReady));

        let chart = engine.chart(&user).unwrap();
        assert_eq!(chart.positions().len(), 10);
    }

    #[tokio::test]
    async fn test_invalid_input_keeps_state() {
        let mut engine = engine();
        let user = UserId::from("u1");

        engine.handle(&user, Event::Text("junk".into())).await;
        assert_eq!(engine.state_tag(&user), Some(StateTag::AwaitingDate));

        engine.handle(&user, Event::Text("15.06.1990".into())).await;
        engine.handle(&user, Event::Text("25:00".into())).await;
        assert_eq!(engine.state_tag(&user), Some(StateTag::AwaitingTime));
    }

    #[tokio::test]
    async fn test_unresolvable_place_stays_awaiting_place() {
        let mut engine = engine();
        let user = UserId::from("u1");

        engine.handle(&user, Event::Text("15.06.1990".into())).await;
        engine.handle(&user, Event::Text("08:45".into())).await;
        let reply = engine.handle(&user, Event::Text("Atlantis".into())).await;

        assert!(reply.text.contains("could not find that place"));
        assert_eq!(engine.state_tag(&user), Some(StateTag::AwaitingPlace));
        assert!(engine.chart(&user).is_none());
    }

    #[tokio::test]
    async fn test_selection_is_idempotent() {
        let mut engine = engine();
        let user = UserId::from("u1");
        drive_to_chart(&mut engine, &user).await;

        let first = engine.handle(&user, Event::Select("Venus".into())).await;
        let second = engine.handle(&user, Event::Select("Venus".into())).await;
        assert_eq!(first, second);
        assert!(first.text.starts_with("Venus: 108.00"));
    }

    #[tokio::test]
    async fn test_reset_from_any_state() {
        let mut engine = engine();
        let user = UserId::from("u1");

        // Mid-collection
        engine.handle(&user, Event::Text("15.06.1990".into())).await;
        let reply = engine.handle(&user, Event::Reset).await;
        assert_eq!(reply.text, views::date_prompt());
        assert_eq!(engine.state_tag(&user), Some(StateTag::AwaitingDate));

        // From ChartReady, via the selection label
        drive_to_chart(&mut engine, &user).await;
        assert_eq!(engine.state_tag(&user), Some(StateTag::ChartReady));
        let reply = engine.handle(&user, Event::Select(views::NEW_CHART_LABEL.into())).await;
        assert_eq!(reply.text, views::date_prompt());
        assert!(engine.chart(&user).is_none());
    }

    #[tokio::test]
    async fn test_selection_before_chart_prompts_current_step() {
        let mut engine = engine();
        let user = UserId::from("u1");

        let reply = engine.handle(&user, Event::Select("Sun".into())).await;
        assert_eq!(reply.text, views::date_prompt());
        assert_eq!(engine.state_tag(&user), Some(StateTag::AwaitingDate));
    }

    #[tokio::test]
    async fn test_sessions_do_not_interfere() {
        let mut engine = engine();
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        drive_to_chart(&mut engine, &alice).await;
        assert_eq!(engine.state_tag(&alice), Some(StateTag::ChartReady));
        assert_eq!(engine.state_tag(&bob), None);

        engine.handle(&bob, Event::Text("01.01.2000".into())).await;
        assert_eq!(engine.state_tag(&bob), Some(StateTag::AwaitingTime));
        assert_eq!(engine.state_tag(&alice), Some(StateTag::ChartReady));
    }

    #[tokio::test]
    async fn test_unknown_selection_in_chart_ready() {
        let mut engine = engine();
        let user = UserId::from("u1");
        drive_to_chart(&mut engine, &user).await;

        let reply = engine.handle(&user, Event::Select("Chiron".into())).await;
        assert_eq!(reply.text, views::unknown_selection());
        assert_eq!(engine.state_tag(&user), Some(StateTag::ChartReady));
    }

    #[test]
    fn test_geo_error_maps_through_chart_error() {
        // Transport-level geo errors share the retry wording path
        let message = views::resolution_message(&ChartError::Geo(GeoError::PlaceNotFound));
        assert!(message.contains("existing city"));
    }
}
