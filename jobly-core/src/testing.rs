use crate::{Company, CompanyRepository, FieldMap, JobRepository, NewJob, Stash};
use serde_json::json;

fn company(handle: &str, name: &str, num_employees: i32) -> Company {
    Company {
        handle: handle.to_string(),
        name: name.to_string(),
        description: format!("Desc {name}"),
        num_employees: Some(num_employees),
        logo_url: Some(format!("http://{handle}.img")),
    }
}

fn filters(pairs: &[(&str, serde_json::Value)]) -> Stash {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn handles(companies: &[Company]) -> Vec<&str> {
    companies.iter().map(|c| c.handle.as_str()).collect()
}

/// Seeds `c1`..`c3` with 1, 2 and 3 employees.
pub async fn seed_companies(repo: &dyn CompanyRepository) {
    for i in 1..=3 {
        repo.create(company(&format!("c{i}"), &format!("C{i}"), i))
            .await
            .unwrap();
    }
}

/// Seeds three jobs for `c1`: `Job1` (100, 0.1), `Job2` (200, 0.2), `Job3` (300, no equity).
pub async fn seed_jobs(jobs: &dyn JobRepository) -> Vec<i32> {
    let rows = [
        ("Job1", 100, Some(0.1)),
        ("Job2", 200, Some(0.2)),
        ("Job3", 300, None),
    ];
    let mut ids = Vec::new();
    for (title, salary, equity) in rows {
        let job = jobs
            .create(NewJob {
                title: title.to_string(),
                salary: Some(salary),
                equity,
                company_handle: "c1".to_string(),
            })
            .await
            .unwrap();
        ids.push(job.id);
    }
    ids
}

// ---- Company Certification Tests ----

pub async fn test_create_company_should_store_and_return(repo: &dyn CompanyRepository) {
    let new = company("new", "New", 1);
    let created = repo.create(new.clone()).await.unwrap();
    assert_eq!(created, new);

    let all = repo.find_all(&Stash::new()).await.unwrap();
    assert_eq!(handles(&all), vec!["new"]);
}

pub async fn test_create_duplicate_company_should_fail(repo: &dyn CompanyRepository) {
    repo.create(company("dup", "Dup", 1)).await.unwrap();
    let err = repo.create(company("dup", "Dup", 1)).await.unwrap_err();
    assert!(err.is_validation(), "expected validation error, got {err:?}");
}

pub async fn test_find_all_companies_without_filters(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    let all = repo.find_all(&Stash::new()).await.unwrap();
    assert_eq!(handles(&all), vec!["c1", "c2", "c3"]);
}

pub async fn test_find_all_companies_by_name(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    let found = repo
        .find_all(&filters(&[("name", json!("c2"))]))
        .await
        .unwrap();
    assert_eq!(handles(&found), vec!["c2"]);
}

pub async fn test_find_all_companies_by_employee_range(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    let found = repo
        .find_all(&filters(&[
            ("minEmployees", json!("2")),
            ("maxEmployees", json!(2)),
        ]))
        .await
        .unwrap();
    assert_eq!(handles(&found), vec!["c2"]);
}

pub async fn test_find_all_companies_combines_filters(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    let found = repo
        .find_all(&filters(&[
            ("name", json!("C")),
            ("minEmployees", json!(2)),
        ]))
        .await
        .unwrap();
    assert_eq!(handles(&found), vec!["c2", "c3"]);
}

pub async fn test_find_all_companies_rejects_bad_filters(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    let err = repo
        .find_all(&filters(&[("color", json!("red"))]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid filter: color"));

    let err = repo
        .find_all(&filters(&[
            ("minEmployees", json!(3)),
            ("maxEmployees", json!(1)),
        ]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid min/max range"));
}

pub async fn test_get_company_should_include_jobs(
    repo: &dyn CompanyRepository,
    jobs: &dyn JobRepository,
) {
    seed_companies(repo).await;
    let ids = seed_jobs(jobs).await;

    let detail = repo.get("c1").await.unwrap();
    assert_eq!(detail.company.name, "C1");
    let job_ids: Vec<i32> = detail.jobs.iter().map(|j| j.id).collect();
    assert_eq!(job_ids, ids);

    let empty = repo.get("c2").await.unwrap();
    assert!(empty.jobs.is_empty());
}

pub async fn test_get_missing_company_should_fail(repo: &dyn CompanyRepository) {
    let err = repo.get("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

pub async fn test_update_company_should_change_only_given_fields(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    let data = FieldMap::new()
        .with("numEmployees", json!(10))
        .with("logoUrl", serde_json::Value::Null);
    let updated = repo.update("c1", &data).await.unwrap();
    assert_eq!(updated.name, "C1");
    assert_eq!(updated.description, "Desc C1");
    assert_eq!(updated.num_employees, Some(10));
    assert_eq!(updated.logo_url, None);
}

pub async fn test_update_company_should_reject_bad_data(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    let err = repo.update("c1", &FieldMap::new()).await.unwrap_err();
    assert!(err.to_string().contains("no data"));

    let err = repo
        .update("c1", &FieldMap::new().with("handle", json!("c9")))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = repo
        .update("c1", &FieldMap::new().with("numEmployees", json!(2.5)))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    let stored = repo.get("c1").await.unwrap();
    assert_eq!(stored.company.num_employees, Some(1));
}

pub async fn test_update_missing_company_should_fail(repo: &dyn CompanyRepository) {
    let err = repo
        .update("nope", &FieldMap::new().with("name", json!("x")))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

pub async fn test_remove_company(repo: &dyn CompanyRepository) {
    seed_companies(repo).await;
    repo.remove("c1").await.unwrap();
    assert!(repo.get("c1").await.unwrap_err().is_not_found());
    assert!(repo.remove("c1").await.unwrap_err().is_not_found());
}

// ---- Job Certification Tests ----

pub async fn test_create_job_should_store_and_return(jobs: &dyn JobRepository) {
    let job = jobs
        .create(NewJob {
            title: "new".to_string(),
            salary: Some(1000),
            equity: Some(0.5),
            company_handle: "c1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(job.title, "new");
    assert_eq!(job.salary, Some(1000));
    assert_eq!(job.equity, Some(0.5));
    assert_eq!(job.company_handle, "c1");
}

pub async fn test_create_job_for_missing_company_should_fail(jobs: &dyn JobRepository) {
    let err = jobs
        .create(NewJob {
            title: "orphan".to_string(),
            salary: None,
            equity: None,
            company_handle: "nope".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected not found, got {err:?}");
}

pub async fn test_find_all_jobs_with_filters(jobs: &dyn JobRepository) {
    seed_jobs(jobs).await;

    let all = jobs.find_all(&Stash::new()).await.unwrap();
    assert_eq!(all.len(), 3);

    let found = jobs
        .find_all(&filters(&[("minSalary", json!(150)), ("title", json!("job"))]))
        .await
        .unwrap();
    let titles: Vec<&str> = found.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Job2", "Job3"]);

    let with_equity = jobs
        .find_all(&filters(&[("hasEquity", json!("true"))]))
        .await
        .unwrap();
    let titles: Vec<&str> = with_equity.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Job1", "Job2"]);

    let any_equity = jobs
        .find_all(&filters(&[("hasEquity", json!(false))]))
        .await
        .unwrap();
    assert_eq!(any_equity.len(), 3);

    let all_three = jobs
        .find_all(&filters(&[
            ("title", json!("2")),
            ("minSalary", json!(100)),
            ("hasEquity", json!(true)),
        ]))
        .await
        .unwrap();
    let titles: Vec<&str> = all_three.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Job2"]);
}

pub async fn test_find_all_jobs_rejects_unknown_filter(jobs: &dyn JobRepository) {
    let err = jobs
        .find_all(&filters(&[("company", json!("c1"))]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid filter: company"));
}

pub async fn test_get_job_should_include_company(jobs: &dyn JobRepository) {
    let ids = seed_jobs(jobs).await;
    let detail = jobs.get(ids[0]).await.unwrap();
    assert_eq!(detail.title, "Job1");
    assert_eq!(detail.company.handle, "c1");
    assert!(jobs.get(0).await.unwrap_err().is_not_found());
}

pub async fn test_update_job_should_change_only_given_fields(jobs: &dyn JobRepository) {
    let ids = seed_jobs(jobs).await;
    let updated = jobs
        .update(ids[0], &FieldMap::new().with("salary", json!(500)))
        .await
        .unwrap();
    assert_eq!(updated.title, "Job1");
    assert_eq!(updated.salary, Some(500));
    assert_eq!(updated.equity, Some(0.1));

    let err = jobs
        .update(ids[0], &FieldMap::new().with("companyHandle", json!("c2")))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = jobs
        .update(ids[0], &FieldMap::new().with("salary", json!(1.5)))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(jobs.get(ids[0]).await.unwrap().salary, Some(500));

    let err = jobs
        .update(0, &FieldMap::new().with("title", json!("x")))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

pub async fn test_remove_job(jobs: &dyn JobRepository) {
    let ids = seed_jobs(jobs).await;
    jobs.remove(ids[0]).await.unwrap();
    assert!(jobs.get(ids[0]).await.unwrap_err().is_not_found());
    assert!(jobs.remove(ids[0]).await.unwrap_err().is_not_found());
}
