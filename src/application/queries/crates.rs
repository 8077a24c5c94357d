use crate::{
    application::{
        dto::{
            CrateDto, DownloadsDto, ExtraDownloadDto, Page, PageRequest, SummaryDto,
            VersionDownloadDto, VersionDto,
        },
        error::{ApplicationError, ApplicationResult},
    },
    domain::krate::{Crate, CrateName, CrateReadRepository, CrateSearch, Version},
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

const SUMMARY_LIST_LENGTH: u32 = 10;
/// Versions whose daily downloads are reported one by one.
const DETAILED_VERSIONS: usize = 5;
const DOWNLOAD_WINDOW_DAYS: u64 = 90;

pub struct SearchCratesQuery {
    pub query: String,
    pub page: PageRequest,
}

pub struct CrateQueryService {
    read_repo: Arc<dyn CrateReadRepository>,
    default_per_page: u32,
    max_per_page: u32,
}

impl CrateQueryService {
    pub fn new(read_repo: Arc<dyn CrateReadRepository>, default_per_page: u32, max_per_page: u32) -> Self {
        Self {
            read_repo,
            default_per_page,
            max_per_page,
        }
    }

    pub async fn search(&self, query: SearchCratesQuery) -> ApplicationResult<Page<CrateDto>> {
        let (page, per_page, offset) = query
            .page
            .resolve(self.default_per_page, self.max_per_page)?;

        let needle = query.query.trim().to_lowercase();
        tracing::debug!(query = %needle, page, per_page, "searching crates");

        let (records, total) = self
            .read_repo
            .search(CrateSearch {
                query: needle,
                offset,
                limit: per_page,
            })
            .await?;

        Ok(Page {
            items: records.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    pub async fn get_crate(&self, name: &str) -> ApplicationResult<CrateDto> {
        self.load(name).await.map(Into::into)
    }

    /// Every version of the crate, newest first.
    pub async fn versions(&self, name: &str) -> ApplicationResult<Vec<VersionDto>> {
        let krate = self.load(name).await?;
        let name = krate.name.as_str();
        Ok(krate.versions.iter().map(|v| VersionDto::new(name, v)).collect())
    }

    /// Daily downloads over the last ninety days before `now`.
    pub async fn downloads(&self, name: &str, now: DateTime<Utc>) -> ApplicationResult<DownloadsDto> {
        let krate = self.load(name).await?;
        tracing::debug!(krate = %krate.name, versions = krate.versions.len(), "collecting downloads");
        Ok(download_window(&krate.versions, now.date_naive()))
    }

    async fn load(&self, name: &str) -> ApplicationResult<Crate> {
        // a name that can never exist is reported the same way as a missing crate
        let name = CrateName::new(name)
            .map_err(|_| ApplicationError::not_found(format!("crate `{name}` does not exist")))?;

        self.read_repo
            .find_by_name(&name)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("crate `{name}` does not exist")))
    }

    pub async fn list_by_keyword(&self, keyword: &str) -> ApplicationResult<Vec<CrateDto>> {
        let records = self.read_repo.list_by_keyword(keyword).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn summary(&self) -> ApplicationResult<SummaryDto> {
        let (num_crates, num_downloads) = self.read_repo.totals().await?;
        let most_downloaded = self.read_repo.most_downloaded(SUMMARY_LIST_LENGTH).await?;
        let just_updated = self.read_repo.recently_updated(SUMMARY_LIST_LENGTH).await?;

        Ok(SummaryDto {
            num_crates,
            num_downloads,
            most_downloaded: most_downloaded.into_iter().map(Into::into).collect(),
            just_updated: just_updated.into_iter().map(Into::into).collect(),
        })
    }
}

/// Splits the newest versions' daily records from the summed downloads of the
/// rest. Only days strictly after `today - 90 days` count.
fn download_window(versions: &[Version], today: NaiveDate) -> DownloadsDto {
    let cutoff = today
        .checked_sub_days(Days::new(DOWNLOAD_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN);

    let mut sorted: Vec<&Version> = versions.iter().collect();
    sorted.sort_by(|a, b| b.num.cmp(&a.num));
    let (latest, rest) = sorted.split_at(sorted.len().min(DETAILED_VERSIONS));

    let mut version_downloads: Vec<VersionDownloadDto> = latest
        .iter()
        .flat_map(|&v| {
            v.daily_downloads
                .iter()
                .filter(move |d| d.date > cutoff)
                .map(move |d| VersionDownloadDto {
                    version: v.num.to_string(),
                    downloads: d.downloads,
                    date: d.date,
                })
        })
        .collect();
    version_downloads.sort_by(|a, b| a.date.cmp(&b.date));

    let mut extra: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for day in rest.iter().flat_map(|v| &v.daily_downloads) {
        if day.date > cutoff {
            *extra.entry(day.date).or_default() += day.downloads;
        }
    }

    DownloadsDto {
        version_downloads,
        extra_downloads: extra
            .into_iter()
            .map(|(date, downloads)| ExtraDownloadDto { date, downloads })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::krate::{DailyDownloads, VersionNum};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 11, d).unwrap()
    }

    fn version(num: &str, daily: &[(NaiveDate, u64)]) -> Version {
        Version {
            num: VersionNum::parse(num).unwrap(),
            downloads: daily.iter().map(|(_, n)| n).sum(),
            yanked: false,
            created_at: Utc::now(),
            daily_downloads: daily
                .iter()
                .map(|&(date, downloads)| DailyDownloads { date, downloads })
                .collect(),
        }
    }

    #[test]
    fn older_versions_are_summed_per_day() {
        let versions: Vec<Version> = (0..7)
            .map(|minor| version(&format!("0.{minor}.0"), &[(day(19), 1), (day(18), 2)]))
            .collect();

        let window = download_window(&versions, day(20));

        assert_eq!(window.version_downloads.len(), 10);
        assert!(
            window
                .version_downloads
                .iter()
                .all(|d| d.version != "0.1.0" && d.version != "0.0.0")
        );
        assert!(window.version_downloads.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(
            window.extra_downloads,
            vec![
                ExtraDownloadDto { date: day(18), downloads: 4 },
                ExtraDownloadDto { date: day(19), downloads: 2 },
            ]
        );
    }

    #[test]
    fn days_outside_the_window_are_dropped() {
        let old = NaiveDate::from_ymd_opt(2017, 8, 22).unwrap();
        let edge = NaiveDate::from_ymd_opt(2017, 8, 23).unwrap();
        let versions = vec![version("1.0.0", &[(old, 5), (edge, 6), (day(20), 7)])];

        let window = download_window(&versions, day(20));

        let dates: Vec<NaiveDate> = window.version_downloads.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![edge, day(20)]);
        assert!(window.extra_downloads.is_empty());
    }
}
