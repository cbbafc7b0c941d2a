pub mod consolidate;
pub mod enrich;
pub mod error;
pub mod fanout;
pub mod map;
pub mod pipeline;
pub mod position;
pub mod resolver;
pub mod service;
pub mod session;

pub use consolidate::consolidate;
pub use enrich::enrich_candidate;
pub use error::{GeocodeError, GeolocationError, LocateError, RenderError};
pub use fanout::{collect_candidates, Collected, KeywordFailure};
pub use map::{
    GeoJsonMap, MapRenderer, MapView, Marker, MemoryMap, Popup, DEFAULT_CENTER, INITIAL_ZOOM,
    RESULTS_ZOOM,
};
pub use pipeline::{run_search_cycle, CycleReport, SearchOutcome};
pub use position::{
    parse_position_line, LinePositionSource, PositionReading, PositionSource, PositionWatch,
    UnsupportedPositionSource, WatchOptions,
};
pub use resolver::resolve_postal_code;
pub use service::PlacesService;
pub use session::{SearchSession, WatchEvent};
