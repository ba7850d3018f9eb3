// ============================================================
// HTML PAGES
// ============================================================
// The two pages the tool serves. Markup is rendered inline; the
// index page submits the form with fetch and polls /progress so
// the bar moves while the pipeline runs.

fn upload_options(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!(r#"<option value="{}">{}</option>"#, name, name))
        .collect::<Vec<_>>()
        .join("\n        ")
}

pub fn index_page(homepage_uploads: &[String], internal_uploads: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Sitemap Generator</title>
<style>
  body {{ font-family: sans-serif; max-width: 640px; margin: 2rem auto; }}
  fieldset {{ margin-bottom: 1rem; }}
  #bar {{ width: 100%; background: #eee; height: 1.5rem; display: none; }}
  #fill {{ background: #4caf50; height: 100%; width: 0; }}
  #status {{ margin-top: 0.5rem; }}
  .error {{ color: #b00020; }}
</style>
</head>
<body>
<h1>Sitemap Generator</h1>
<form id="generate" method="post" action="/" enctype="multipart/form-data">
  <fieldset>
    <legend>Homepage CSV</legend>
    <input type="file" name="homepage_file" accept=".csv">
    <p>or reuse a previous upload:</p>
    <select name="homepage_select">
        <option value="">-- none --</option>
        {homepage_options}
    </select>
  </fieldset>
  <fieldset>
    <legend>Internal pages CSV</legend>
    <input type="file" name="internal_file" accept=".csv">
    <p>or reuse a previous upload:</p>
    <select name="internal_select">
        <option value="">-- none --</option>
        {internal_options}
    </select>
  </fieldset>
  <button type="submit">Generate sitemaps</button>
</form>
<div id="bar"><div id="fill"></div></div>
<p id="status"></p>
<script>
const form = document.getElementById('generate');
const bar = document.getElementById('bar');
const fill = document.getElementById('fill');
const status = document.getElementById('status');

form.addEventListener('submit', (event) => {{
  event.preventDefault();
  bar.style.display = 'block';
  status.textContent = 'Starting...';
  status.className = '';

  const poll = setInterval(async () => {{
    try {{
      const res = await fetch('/progress');
      const progress = await res.json();
      fill.style.width = progress.percentage + '%';
      status.textContent = progress.status;
      if (progress.error) {{
        clearInterval(poll);
        status.textContent = progress.error;
        status.className = 'error';
      }}
    }} catch (err) {{
      // server busy on the blocking pipeline, keep polling
    }}
  }}, 500);

  fetch('/', {{ method: 'POST', body: new FormData(form), redirect: 'follow' }})
    .then((res) => {{
      clearInterval(poll);
      if (res.redirected) {{
        window.location = res.url;
      }}
    }})
    .catch((err) => {{
      clearInterval(poll);
      status.textContent = 'Request failed: ' + err;
      status.className = 'error';
    }});
}});
</script>
</body>
</html>
"#,
        homepage_options = upload_options(homepage_uploads),
        internal_options = upload_options(internal_uploads),
    )
}

pub fn success_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Sitemaps Ready</title>
<style>
  body { font-family: sans-serif; max-width: 640px; margin: 2rem auto; }
  li { margin: 0.4rem 0; }
</style>
</head>
<body>
<h1>Sitemaps generated</h1>
<h2>Per-locale sitemaps</h2>
<ul>
  <li><a href="/download_compressed">Compressed sitemaps (.xml.gz)</a></li>
  <li><a href="/download_raw">Raw sitemaps (.xml)</a></li>
</ul>
<h2>Master sitemaps</h2>
<ul>
  <li><a href="/download_master_compressed">Compressed master sitemaps</a></li>
  <li><a href="/download_master_raw">Raw master sitemaps</a></li>
</ul>
<h2>Paginated sitemaps</h2>
<ul>
  <li><a href="/download_paginated_compressed">Compressed paginated sitemaps</a></li>
  <li><a href="/download_paginated_raw">Raw paginated sitemaps</a></li>
</ul>
<h2>Reports</h2>
<ul>
  <li><a href="/download_csv">All URLs report (CSV)</a></li>
  <li><a href="/download_paginated_csv">Paginated URLs report (CSV)</a></li>
  <li><a href="/download_skipped">Skipped locales report (CSV)</a></li>
</ul>
<p><a href="/">Generate another set</a></p>
</body>
</html>
"#
    .to_string()
}
