use axum::response::Html;

/// GET /
/// The whole UI: a topic field, a submit button, and a result area.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Reddit post generator</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }
    form { display: flex; gap: .5rem; }
    input[type=text] { flex: 1; padding: .5rem; font-size: 1rem; }
    button { padding: .5rem 1rem; font-size: 1rem; }
    pre { white-space: pre-wrap; background: #f6f6f6; padding: 1rem; border-radius: 4px; }
    .error { color: #a40000; }
    details { margin-top: .75rem; }
  </style>
</head>
<body>
  <h1>Generate a Reddit post</h1>
  <form id="topic-form">
    <input type="text" id="topic" name="topic" placeholder="Enter a topic for the Reddit post" required>
    <button type="submit" id="submit">Generate</button>
  </form>
  <p id="status"></p>
  <section id="result" hidden>
    <h2>Post</h2>
    <pre id="post"></pre>
    <details><summary>Search results</summary><pre id="search-results"></pre></details>
    <details><summary>Best URL</summary><pre id="selected-url"></pre></details>
    <details><summary>Page content</summary><pre id="page-text"></pre></details>
    <details><summary>Summaries</summary><pre id="summaries"></pre></details>
  </section>
  <script>
    const form = document.getElementById("topic-form");
    const statusLine = document.getElementById("status");
    const result = document.getElementById("result");

    form.addEventListener("submit", async (event) => {
      event.preventDefault();
      const topic = document.getElementById("topic").value;
      document.getElementById("submit").disabled = true;
      result.hidden = true;
      statusLine.className = "";
      statusLine.textContent = "Searching, reading and writing. This can take a minute...";

      try {
        const response = await fetch("/api/v1/posts", {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify({ topic }),
        });
        const body = await response.json().catch(() => ({
          error: { code: `HTTP ${response.status}`, message: response.statusText },
        }));
        if (!response.ok) {
          statusLine.className = "error";
          statusLine.textContent = `${body.error.code}: ${body.error.message}`;
          return;
        }
        statusLine.textContent = "";
        document.getElementById("post").textContent = body.post;
        document.getElementById("search-results").textContent = JSON.stringify(body.search_results, null, 2);
        document.getElementById("selected-url").textContent = body.selected_url;
        document.getElementById("page-text").textContent = body.page_text;
        document.getElementById("summaries").textContent = body.summaries.join("\n\n---\n\n");
        result.hidden = false;
      } catch (err) {
        statusLine.className = "error";
        statusLine.textContent = `Request failed: ${err}`;
      } finally {
        document.getElementById("submit").disabled = false;
      }
    });
  </script>
</body>
</html>
"#;
