use crate::common::errors::AppError;
use crate::not_found;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tvb_entity::{data_types, region_mapping, time_series, time_series_region};

/// Time-series flavour, as recorded by the type tag in `DATA_TYPES`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeSeriesKind {
    Region,
    Surface,
    Eeg,
    Seeg,
    Meg,
    Volume,
    Other(String),
}

impl TimeSeriesKind {
    pub fn type_tag(&self) -> &str {
        match self {
            TimeSeriesKind::Region => "TimeSeriesRegion",
            TimeSeriesKind::Surface => "TimeSeriesSurface",
            TimeSeriesKind::Eeg => "TimeSeriesEEG",
            TimeSeriesKind::Seeg => "TimeSeriesSEEG",
            TimeSeriesKind::Meg => "TimeSeriesMEG",
            TimeSeriesKind::Volume => "TimeSeriesVolume",
            TimeSeriesKind::Other(tag) => tag,
        }
    }

    /// Surface, EEG, SEEG and MEG series always project onto a cortical surface.
    pub fn is_surface_family(&self) -> bool {
        matches!(
            self,
            TimeSeriesKind::Surface | TimeSeriesKind::Eeg | TimeSeriesKind::Seeg | TimeSeriesKind::Meg
        )
    }

    pub fn is_volume_family(&self) -> bool {
        matches!(self, TimeSeriesKind::Volume)
    }
}

impl FromStr for TimeSeriesKind {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Ok(match tag {
            "TimeSeriesRegion" => TimeSeriesKind::Region,
            "TimeSeriesSurface" => TimeSeriesKind::Surface,
            "TimeSeriesEEG" => TimeSeriesKind::Eeg,
            "TimeSeriesSEEG" => TimeSeriesKind::Seeg,
            "TimeSeriesMEG" => TimeSeriesKind::Meg,
            "TimeSeriesVolume" => TimeSeriesKind::Volume,
            other => TimeSeriesKind::Other(other.to_string()),
        })
    }
}

impl From<&str> for TimeSeriesKind {
    fn from(tag: &str) -> Self {
        match tag.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for TimeSeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MappingFlags {
    pub has_surface_mapping: bool,
    pub has_volume_mapping: bool,
}

impl MappingFlags {
    /// Same rules the 1.3.2 migration applied to existing rows.
    ///
    /// `region` is the region time-series row sharing the series id, if any.
    pub fn compute(kind: &TimeSeriesKind, region: Option<&time_series_region::Model>) -> Self {
        let linked_surface = region.is_some_and(|r| r.region_mapping.is_some());
        let linked_volume = region.is_some_and(|r| r.region_mapping_volume.is_some());
        MappingFlags {
            has_surface_mapping: kind.is_surface_family() || linked_surface,
            has_volume_mapping: kind.is_volume_family() || linked_volume,
        }
    }
}

/// Gid of the region mapping built on `connectivity_gid`, lowest id first when several exist.
pub async fn resolve_region_mapping<C>(
    db: &C,
    connectivity_gid: &str,
) -> Result<Option<String>, AppError>
where
    C: ConnectionTrait,
{
    let found = region_mapping::Entity::find()
        .filter(region_mapping::Column::Connectivity.eq(connectivity_gid))
        .find_also_related(data_types::Entity)
        .order_by_asc(data_types::Column::Id)
        .one(db)
        .await?;

    Ok(found.and_then(|(_, data_type)| data_type).map(|dt| dt.gid))
}

/// Recomputes and stores the mapping flags of one time-series written after the migration.
///
/// A region series without a region mapping is linked first, using the same
/// lowest-id rule as the migration.
pub async fn refresh_mapping_flags<C>(db: &C, time_series_id: i32) -> Result<MappingFlags, AppError>
where
    C: ConnectionTrait,
{
    let (series, data_type) = time_series::Entity::find_by_id(time_series_id)
        .find_also_related(data_types::Entity)
        .one(db)
        .await?
        .ok_or_else(|| not_found!("Time series", time_series_id))?;
    let data_type = data_type.ok_or_else(|| not_found!("Data type", time_series_id))?;
    let kind = TimeSeriesKind::from(data_type.type_tag.as_str());

    let mut region = time_series_region::Entity::find_by_id(time_series_id)
        .one(db)
        .await?;

    if let Some(row) = region.take() {
        region = Some(link_region_mapping(db, row).await?);
    }

    let flags = MappingFlags::compute(&kind, region.as_ref());

    let mut active: time_series::ActiveModel = series.into();
    active.has_surface_mapping = Set(Some(flags.has_surface_mapping));
    active.has_volume_mapping = Set(Some(flags.has_volume_mapping));
    active.update(db).await?;

    tracing::debug!(
        time_series_id,
        kind = %kind,
        surface = flags.has_surface_mapping,
        volume = flags.has_volume_mapping,
        "Refreshed mapping flags"
    );
    Ok(flags)
}

async fn link_region_mapping<C>(
    db: &C,
    row: time_series_region::Model,
) -> Result<time_series_region::Model, AppError>
where
    C: ConnectionTrait,
{
    if row.region_mapping.is_some() {
        return Ok(row);
    }
    let Some(connectivity) = row.connectivity.as_deref() else {
        return Ok(row);
    };
    let Some(gid) = resolve_region_mapping(db, connectivity).await? else {
        return Ok(row);
    };

    let mut active: time_series_region::ActiveModel = row.into();
    active.region_mapping = Set(Some(gid));
    Ok(active.update(db).await?)
}
