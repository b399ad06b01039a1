use crate::models::incident::Incident;

/// 地球半径（米）
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// 使用 Haversine 公式计算两点间的球面距离（米）
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // 浮点误差可能让 a 略超出 [0, 1]，sqrt 会得到 NaN
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// 判断坐标是否落在事件区域内，边界上的点算在区域内
pub fn contains(incident: &Incident, lat: f64, lng: f64) -> bool {
    calculate_distance(incident.lat, incident.lng, lat, lng) <= incident.radius
}

/// 按活跃事件的顺序返回所有命中的事件ID
pub fn matching_incident_ids(incidents: &[Incident], lat: f64, lng: f64) -> Vec<uuid::Uuid> {
    incidents
        .iter()
        .filter(|incident| contains(incident, lat, lng))
        .map(|incident| incident.id)
        .collect()
}
